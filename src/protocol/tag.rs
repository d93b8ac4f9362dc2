//! # Tagged Messages
//!
//! Ordered `tag -> bytes` containers used for handshake and reset messages.
//!
//! ## Wire Format
//! ```text
//! [name(4)] [count(2)] [padding(2)]
//! [key(4) endOffset(4)] * count
//! [value bytes, concatenated in entry order]
//! ```
//!
//! No entry stores its own length. `endOffset` is the running total of value
//! lengths up to and including that entry, measured from the start of the
//! value region, so each length is recovered as `end[i] - end[i - 1]`.
//!
//! Entry order is significant: it fixes both the header layout and the offset
//! computation, and it is preserved exactly through encode and decode.

use std::collections::HashMap;
use std::fmt;

use bytes::{BufMut, Bytes};
use tracing::{debug, trace};

use crate::config::LimitsConfig;
use crate::core::wire::WireReader;
use crate::error::{constants, Malformed, ProtocolError, Result};

/// Four-byte ASCII tag naming a message or one of its entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for Tag {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Tag {
    type Error = ProtocolError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let array: [u8; 4] = bytes.try_into().map_err(|_| {
            ProtocolError::InvalidTag(format!(
                "{} (got {} bytes)",
                constants::ERR_TAG_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }
}

/// Tags shorter than four characters are zero-padded, as in `"REJ"`.
impl TryFrom<&str> for Tag {
    type Error = ProtocolError;

    fn try_from(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 {
            return Err(ProtocolError::InvalidTag(format!(
                "{}: {s:?}",
                constants::ERR_TAG_LENGTH
            )));
        }
        let mut array = [0u8; 4];
        array[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(array))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter().take_while(|&&b| b != 0) {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

/// Well-known message and entry tags.
pub mod tags {
    use super::Tag;

    /// Public reset
    pub const PRST: Tag = Tag::new(b"PRST");
    /// Public reset nonce proof
    pub const RNON: Tag = Tag::new(b"RNON");
    /// Rejected packet number
    pub const RSEQ: Tag = Tag::new(b"RSEQ");
    /// Client address
    pub const CADR: Tag = Tag::new(b"CADR");

    /// Client hello
    pub const CHLO: Tag = Tag::new(b"CHLO");
    /// Server hello
    pub const SHLO: Tag = Tag::new(b"SHLO");
    /// Reject
    pub const REJ: Tag = Tag::new(b"REJ\0");
    /// Server config
    pub const SCFG: Tag = Tag::new(b"SCFG");

    pub const VER: Tag = Tag::new(b"VER\0");
    pub const PAD: Tag = Tag::new(b"PAD\0");
    pub const SNI: Tag = Tag::new(b"SNI\0");
    pub const STK: Tag = Tag::new(b"STK\0");
    pub const PDMD: Tag = Tag::new(b"PDMD");
    pub const NONC: Tag = Tag::new(b"NONC");
    pub const SCID: Tag = Tag::new(b"SCID");
    pub const AEAD: Tag = Tag::new(b"AEAD");
    pub const KEXS: Tag = Tag::new(b"KEXS");
    pub const PUBS: Tag = Tag::new(b"PUBS");
}

/// Fixed header: name(4) + count(2) + padding(2).
const HEADER_LEN: usize = 8;
/// Per-entry header: key(4) + endOffset(4).
const ENTRY_HEADER_LEN: usize = 8;

/// Named, ordered collection of tagged byte values.
#[derive(Clone, PartialEq, Eq)]
pub struct QuicTag {
    name: Tag,
    entries: Vec<(Tag, Bytes)>,
    // key -> position of its first occurrence in `entries`
    index: HashMap<Tag, usize>,
}

impl QuicTag {
    pub fn new(name: Tag) -> Self {
        Self {
            name,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> Tag {
        self.name
    }

    /// Append `(key, value)`, or replace the value of an existing key in place.
    ///
    /// If a decoded message repeated `key`, the first occurrence takes the new
    /// value and the later duplicates are removed.
    pub fn set_tag(&mut self, key: Tag, value: impl Into<Bytes>) -> &mut Self {
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => {
                self.entries[pos].1 = value;
                if self.entries[pos + 1..].iter().any(|(k, _)| *k == key) {
                    self.drop_duplicates_after(key, pos);
                }
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, value));
            }
        }
        self
    }

    fn drop_duplicates_after(&mut self, key: Tag, first: usize) {
        let mut pos = 0;
        self.entries.retain(|(k, _)| {
            let keep = *k != key || pos == first;
            pos += 1;
            keep
        });
        self.index.clear();
        for (pos, (k, _)) in self.entries.iter().enumerate() {
            self.index.entry(*k).or_insert(pos);
        }
    }

    pub fn get(&self, key: &Tag) -> Option<&Bytes> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, key: &Tag) -> bool {
        self.index.contains_key(key)
    }

    /// Entry keys in wire order.
    pub fn keys(&self) -> impl Iterator<Item = Tag> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Entries in wire order.
    pub fn entries(&self) -> &[(Tag, Bytes)] {
        &self.entries
    }

    /// Materialize the entries as a lookup map.
    ///
    /// Where a decoded message repeats a key, the first occurrence wins.
    pub fn tags(&self) -> HashMap<Tag, Bytes> {
        self.index
            .iter()
            .map(|(k, &pos)| (*k, self.entries[pos].1.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Running end offsets of each value, in entry order.
    pub fn end_offsets(&self) -> Vec<usize> {
        self.entries
            .iter()
            .scan(0usize, |end, (_, v)| {
                *end += v.len();
                Some(*end)
            })
            .collect()
    }

    fn value_len(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + ENTRY_HEADER_LEN * self.entries.len() + self.value_len()
    }

    /// Write all headers, then all values.
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        let count = u16::try_from(self.entries.len()).map_err(|_| ProtocolError::TooManyEntries {
            count: self.entries.len(),
            max: u16::MAX as usize,
        })?;
        let total = self.value_len();
        if u32::try_from(total).is_err() {
            return Err(ProtocolError::PayloadTooLarge(total));
        }

        buf.put_slice(self.name.as_bytes());
        buf.put_u16_le(count);
        buf.put_u16_le(0);
        for ((key, _), end) in self.entries.iter().zip(self.end_offsets()) {
            buf.put_slice(key.as_bytes());
            // bounded by `total` above
            buf.put_u32_le(end as u32);
        }
        for (_, value) in &self.entries {
            buf.put_slice(value);
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out)?;
        Ok(out)
    }

    /// Decode a message from the front of `buf`.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        Self::decode(buf).map(|(tag, _)| tag)
    }

    /// Decode a message, returning it with the number of bytes consumed.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        Self::decode_with_limits(buf, &LimitsConfig::default())
    }

    pub fn decode_with_limits(buf: &[u8], limits: &LimitsConfig) -> Result<(Self, usize)> {
        let result = Self::parse(buf, limits);
        match &result {
            Ok((tag, consumed)) => {
                trace!(name = %tag.name, entries = tag.len(), consumed, "decoded tag message");
            }
            Err(e) => {
                debug!(error = %e, available = buf.len(), "rejecting tag message");
            }
        }
        result
    }

    fn parse(buf: &[u8], limits: &LimitsConfig) -> Result<(Self, usize)> {
        let mut r = WireReader::new(buf);
        let name = Tag(r.read_array()?);
        let count = r.read_u16_le()? as usize;
        // padding is not checked
        let _ = r.read_u16_le()?;

        if count > limits.max_tag_entries {
            return Err(Malformed::TooManyEntries {
                count,
                max: limits.max_tag_entries,
            }
            .into());
        }

        let mut headers = Vec::with_capacity(count);
        let mut previous = 0u32;
        for index in 0..count {
            let key = Tag(r.read_array()?);
            let end = r.read_u32_le()?;
            if end < previous {
                return Err(Malformed::OffsetsNotMonotonic {
                    index,
                    previous,
                    current: end,
                }
                .into());
            }
            headers.push((key, (end - previous) as usize));
            previous = end;
        }

        let total = previous as usize;
        if r.remaining() < total {
            return Err(Malformed::PayloadOverrun {
                needed: r.position() + total,
                available: buf.len(),
            }
            .into());
        }

        let mut tag = QuicTag::new(name);
        for (key, len) in headers {
            let value = Bytes::copy_from_slice(r.read_bytes(len)?);
            tag.push_decoded(key, value);
        }
        Ok((tag, r.position()))
    }

    // Decoded messages may repeat a key; keep every entry, index the first.
    fn push_decoded(&mut self, key: Tag, value: Bytes) {
        self.index.entry(key).or_insert(self.entries.len());
        self.entries.push((key, value));
    }
}

impl fmt::Debug for QuicTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuicTag")
            .field("name", &self.name)
            .field("entries", &self.entries)
            .finish()
    }
}
