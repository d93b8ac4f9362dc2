//! Stream identifiers, always carried as 4 little-endian bytes.

use std::fmt;

use bytes::BufMut;

use crate::core::wire::WireReader;
use crate::error::Result;

/// Numeric identifier of a logical stream within a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StreamId(u32);

impl StreamId {
    /// Encoded width in bytes, independent of the numeric value.
    pub const LEN: usize = 4;

    pub const fn from_id(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }

    pub fn to_bytes(self) -> [u8; Self::LEN] {
        self.0.to_le_bytes()
    }

    pub fn encode<B: BufMut>(self, buf: &mut B) {
        buf.put_u32_le(self.0);
    }

    /// Parse the leading 4 bytes of `buf`.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        Self::read(&mut WireReader::new(buf))
    }

    pub(crate) fn read(r: &mut WireReader<'_>) -> Result<Self> {
        r.read_u32_le().map(Self)
    }
}

impl From<u32> for StreamId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<StreamId> for u32 {
    fn from(id: StreamId) -> Self {
        id.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
