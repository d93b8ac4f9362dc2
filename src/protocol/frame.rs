//! # Control Frames
//!
//! Encode/decode for the control frames carried inside a packet payload.
//!
//! Every frame starts with a one-byte type tag; integers are little-endian.
//!
//! ```text
//! Padding          0x00
//! ResetStream      0x01  streamId(4) offset(8) errorCode(4)
//! ConnectionClose  0x02  errorCode(4) reasonLen(2) reason(reasonLen)
//! GoAway           0x03  errorCode(4) streamId(4) reasonLen(2) reason(reasonLen)
//! WindowUpdate     0x04  streamId(4) offset(8)
//! Blocked          0x05  streamId(4)
//! Ping             0x07
//! ```
//!
//! Offsets are opaque 8-byte blobs here; their numeric meaning belongs to
//! flow control. Decoders return the frame together with the number of bytes
//! consumed so the packet layer can continue with the next frame.

use bytes::{BufMut, Bytes};
use tracing::{debug, trace};

use crate::config::LimitsConfig;
use crate::core::stream_id::StreamId;
use crate::core::wire::WireReader;
use crate::error::{Malformed, Result};
use crate::protocol::error_code::QuicError;

/// Raw 8-byte offset field, preserved byte-for-byte.
pub type Offset = [u8; 8];

/// Frame type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    Padding = 0x00,
    ResetStream = 0x01,
    ConnectionClose = 0x02,
    GoAway = 0x03,
    WindowUpdate = 0x04,
    Blocked = 0x05,
    Ping = 0x07,
}

impl FrameType {
    /// Get the type byte for the wire
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Map a type byte to a known frame type
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(FrameType::Padding),
            0x01 => Some(FrameType::ResetStream),
            0x02 => Some(FrameType::ConnectionClose),
            0x03 => Some(FrameType::GoAway),
            0x04 => Some(FrameType::WindowUpdate),
            0x05 => Some(FrameType::Blocked),
            0x07 => Some(FrameType::Ping),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            FrameType::Padding => "PADDING",
            FrameType::ResetStream => "RST_STREAM",
            FrameType::ConnectionClose => "CONNECTION_CLOSE",
            FrameType::GoAway => "GOAWAY",
            FrameType::WindowUpdate => "WINDOW_UPDATE",
            FrameType::Blocked => "BLOCKED",
            FrameType::Ping => "PING",
        }
    }
}

/// Shared contract of every frame kind.
///
/// Implementors describe only the body that follows the type byte; the
/// provided methods add the type byte and the consumed-length bookkeeping.
pub trait WireFrame: Sized {
    const FRAME_TYPE: FrameType;

    /// Encoded length of the body, excluding the type byte.
    fn body_len(&self) -> usize;

    fn encode_body<B: BufMut>(&self, buf: &mut B);

    fn decode_body(r: &mut WireReader<'_>, limits: &LimitsConfig) -> Result<Self>;

    fn encoded_len(&self) -> usize {
        1 + self.body_len()
    }

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(Self::FRAME_TYPE.to_byte());
        self.encode_body(buf);
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out);
        out
    }

    /// Decode a frame of exactly this kind from the front of `buf`.
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize)> {
        Self::from_bytes_with_limits(buf, &LimitsConfig::default())
    }

    fn from_bytes_with_limits(buf: &[u8], limits: &LimitsConfig) -> Result<(Self, usize)> {
        let mut r = WireReader::new(buf);
        let found = r.read_u8()?;
        let expected = Self::FRAME_TYPE.to_byte();
        if found != expected {
            return Err(Malformed::UnexpectedFrameType { expected, found }.into());
        }
        let frame = Self::decode_body(&mut r, limits)?;
        Ok((frame, r.position()))
    }
}

// errorCode is written separately because GoAway puts the stream id between
// the code and the reason.
fn encode_reason<B: BufMut>(error: &QuicError, buf: &mut B) {
    buf.put_u16_le(error.reason_len());
    buf.put_slice(error.reason());
}

fn decode_reason(r: &mut WireReader<'_>, code: u32, limits: &LimitsConfig) -> Result<QuicError> {
    let len = r.read_u16_le()? as usize;
    if len > limits.max_reason_length {
        return Err(Malformed::ReasonTooLong {
            length: len,
            max: limits.max_reason_length,
        }
        .into());
    }
    let reason = r.read_bytes(len)?;
    QuicError::with_reason(code, Bytes::copy_from_slice(reason))
}

/// Single byte of padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaddingFrame;

impl PaddingFrame {
    pub fn new() -> Self {
        Self
    }
}

impl WireFrame for PaddingFrame {
    const FRAME_TYPE: FrameType = FrameType::Padding;

    fn body_len(&self) -> usize {
        0
    }

    fn encode_body<B: BufMut>(&self, _buf: &mut B) {}

    fn decode_body(_r: &mut WireReader<'_>, _limits: &LimitsConfig) -> Result<Self> {
        Ok(Self)
    }
}

/// Abruptly terminates one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetStreamFrame {
    pub stream_id: StreamId,
    pub offset: Offset,
    /// Only the code travels on the wire.
    pub error_code: u32,
}

impl ResetStreamFrame {
    /// Any reason phrase on `error` is dropped; see [`ResetStreamFrame::error`].
    pub fn new(stream_id: StreamId, offset: Offset, error: QuicError) -> Self {
        Self {
            stream_id,
            offset,
            error_code: error.code(),
        }
    }

    /// The error with its reason phrase taken from the table.
    pub fn error(&self) -> QuicError {
        QuicError::new(self.error_code)
    }
}

impl WireFrame for ResetStreamFrame {
    const FRAME_TYPE: FrameType = FrameType::ResetStream;

    fn body_len(&self) -> usize {
        StreamId::LEN + 8 + 4
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) {
        self.stream_id.encode(buf);
        buf.put_slice(&self.offset);
        buf.put_u32_le(self.error_code);
    }

    fn decode_body(r: &mut WireReader<'_>, _limits: &LimitsConfig) -> Result<Self> {
        let stream_id = StreamId::read(r)?;
        let offset = r.read_array::<8>()?;
        let error_code = r.read_u32_le()?;
        Ok(Self {
            stream_id,
            offset,
            error_code,
        })
    }
}

/// Closes the whole connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCloseFrame {
    pub error: QuicError,
}

impl ConnectionCloseFrame {
    pub fn new(error: QuicError) -> Self {
        Self { error }
    }
}

impl WireFrame for ConnectionCloseFrame {
    const FRAME_TYPE: FrameType = FrameType::ConnectionClose;

    fn body_len(&self) -> usize {
        4 + 2 + self.error.reason().len()
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.error.code());
        encode_reason(&self.error, buf);
    }

    fn decode_body(r: &mut WireReader<'_>, limits: &LimitsConfig) -> Result<Self> {
        let code = r.read_u32_le()?;
        let error = decode_reason(r, code, limits)?;
        Ok(Self::new(error))
    }
}

/// Announces that the sender will stop using the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoAwayFrame {
    pub error: QuicError,
    /// Last stream the sender acted on.
    pub stream_id: StreamId,
}

impl GoAwayFrame {
    pub fn new(error: QuicError, stream_id: StreamId) -> Self {
        Self { error, stream_id }
    }
}

impl WireFrame for GoAwayFrame {
    const FRAME_TYPE: FrameType = FrameType::GoAway;

    fn body_len(&self) -> usize {
        4 + StreamId::LEN + 2 + self.error.reason().len()
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.error.code());
        self.stream_id.encode(buf);
        encode_reason(&self.error, buf);
    }

    fn decode_body(r: &mut WireReader<'_>, limits: &LimitsConfig) -> Result<Self> {
        let code = r.read_u32_le()?;
        let stream_id = StreamId::read(r)?;
        let error = decode_reason(r, code, limits)?;
        Ok(Self::new(error, stream_id))
    }
}

/// Raises the flow-control limit of a stream (stream 0: the connection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowUpdateFrame {
    pub stream_id: StreamId,
    pub offset: Offset,
}

impl WindowUpdateFrame {
    pub fn new(stream_id: StreamId, offset: Offset) -> Self {
        Self { stream_id, offset }
    }
}

impl WireFrame for WindowUpdateFrame {
    const FRAME_TYPE: FrameType = FrameType::WindowUpdate;

    fn body_len(&self) -> usize {
        StreamId::LEN + 8
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) {
        self.stream_id.encode(buf);
        buf.put_slice(&self.offset);
    }

    fn decode_body(r: &mut WireReader<'_>, _limits: &LimitsConfig) -> Result<Self> {
        let stream_id = StreamId::read(r)?;
        let offset = r.read_array::<8>()?;
        Ok(Self::new(stream_id, offset))
    }
}

/// Signals the sender is blocked by flow control on a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockedFrame {
    pub stream_id: StreamId,
}

impl BlockedFrame {
    pub fn new(stream_id: StreamId) -> Self {
        Self { stream_id }
    }
}

impl WireFrame for BlockedFrame {
    const FRAME_TYPE: FrameType = FrameType::Blocked;

    fn body_len(&self) -> usize {
        StreamId::LEN
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) {
        self.stream_id.encode(buf);
    }

    fn decode_body(r: &mut WireReader<'_>, _limits: &LimitsConfig) -> Result<Self> {
        Ok(Self::new(StreamId::read(r)?))
    }
}

/// Keep-alive with no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PingFrame;

impl PingFrame {
    pub fn new() -> Self {
        Self
    }
}

impl WireFrame for PingFrame {
    const FRAME_TYPE: FrameType = FrameType::Ping;

    fn body_len(&self) -> usize {
        0
    }

    fn encode_body<B: BufMut>(&self, _buf: &mut B) {}

    fn decode_body(_r: &mut WireReader<'_>, _limits: &LimitsConfig) -> Result<Self> {
        Ok(Self)
    }
}

/// Any control frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Padding(PaddingFrame),
    ResetStream(ResetStreamFrame),
    ConnectionClose(ConnectionCloseFrame),
    GoAway(GoAwayFrame),
    WindowUpdate(WindowUpdateFrame),
    Blocked(BlockedFrame),
    Ping(PingFrame),
}

impl Frame {
    pub fn frame_type(&self) -> FrameType {
        match self {
            Frame::Padding(_) => FrameType::Padding,
            Frame::ResetStream(_) => FrameType::ResetStream,
            Frame::ConnectionClose(_) => FrameType::ConnectionClose,
            Frame::GoAway(_) => FrameType::GoAway,
            Frame::WindowUpdate(_) => FrameType::WindowUpdate,
            Frame::Blocked(_) => FrameType::Blocked,
            Frame::Ping(_) => FrameType::Ping,
        }
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            Frame::Padding(f) => f.encoded_len(),
            Frame::ResetStream(f) => f.encoded_len(),
            Frame::ConnectionClose(f) => f.encoded_len(),
            Frame::GoAway(f) => f.encoded_len(),
            Frame::WindowUpdate(f) => f.encoded_len(),
            Frame::Blocked(f) => f.encoded_len(),
            Frame::Ping(f) => f.encoded_len(),
        }
    }

    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        match self {
            Frame::Padding(f) => f.encode(buf),
            Frame::ResetStream(f) => f.encode(buf),
            Frame::ConnectionClose(f) => f.encode(buf),
            Frame::GoAway(f) => f.encode(buf),
            Frame::WindowUpdate(f) => f.encode(buf),
            Frame::Blocked(f) => f.encode(buf),
            Frame::Ping(f) => f.encode(buf),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out);
        out
    }

    /// Decode one frame from the front of `buf`.
    ///
    /// Returns the decoded frame and the number of bytes consumed.
    pub fn from_bytes(buf: &[u8]) -> Result<(Frame, usize)> {
        Self::from_bytes_with_limits(buf, &LimitsConfig::default())
    }

    pub fn from_bytes_with_limits(buf: &[u8], limits: &LimitsConfig) -> Result<(Frame, usize)> {
        let result = Self::dispatch(buf, limits);
        match &result {
            Ok((frame, consumed)) => {
                trace!(frame_type = frame.frame_type().name(), consumed, "decoded frame");
            }
            Err(e) => {
                debug!(error = %e, available = buf.len(), "rejecting frame");
            }
        }
        result
    }

    fn dispatch(buf: &[u8], limits: &LimitsConfig) -> Result<(Frame, usize)> {
        let type_byte = *buf.first().ok_or(Malformed::Truncated {
            needed: 1,
            available: 0,
        })?;
        let frame_type =
            FrameType::from_byte(type_byte).ok_or(Malformed::UnknownFrameType(type_byte))?;

        Ok(match frame_type {
            FrameType::Padding => {
                let (f, n) = PaddingFrame::from_bytes_with_limits(buf, limits)?;
                (Frame::Padding(f), n)
            }
            FrameType::ResetStream => {
                let (f, n) = ResetStreamFrame::from_bytes_with_limits(buf, limits)?;
                (Frame::ResetStream(f), n)
            }
            FrameType::ConnectionClose => {
                let (f, n) = ConnectionCloseFrame::from_bytes_with_limits(buf, limits)?;
                (Frame::ConnectionClose(f), n)
            }
            FrameType::GoAway => {
                let (f, n) = GoAwayFrame::from_bytes_with_limits(buf, limits)?;
                (Frame::GoAway(f), n)
            }
            FrameType::WindowUpdate => {
                let (f, n) = WindowUpdateFrame::from_bytes_with_limits(buf, limits)?;
                (Frame::WindowUpdate(f), n)
            }
            FrameType::Blocked => {
                let (f, n) = BlockedFrame::from_bytes_with_limits(buf, limits)?;
                (Frame::Blocked(f), n)
            }
            FrameType::Ping => {
                let (f, n) = PingFrame::from_bytes_with_limits(buf, limits)?;
                (Frame::Ping(f), n)
            }
        })
    }

    /// Iterate over every frame in a packet payload.
    pub fn iter(payload: &[u8]) -> FrameIter<'_> {
        FrameIter::new(payload, LimitsConfig::default())
    }
}

macro_rules! impl_from_frame {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Frame {
                fn from(f: $ty) -> Self {
                    Frame::$variant(f)
                }
            }
        )*
    };
}

impl_from_frame!(
    Padding(PaddingFrame),
    ResetStream(ResetStreamFrame),
    ConnectionClose(ConnectionCloseFrame),
    GoAway(GoAwayFrame),
    WindowUpdate(WindowUpdateFrame),
    Blocked(BlockedFrame),
    Ping(PingFrame),
);

/// Iterator over the frames of a payload.
///
/// Stops after the first error; the error is yielded once.
#[derive(Debug, Clone)]
pub struct FrameIter<'a> {
    buf: &'a [u8],
    offset: usize,
    limits: LimitsConfig,
}

impl<'a> FrameIter<'a> {
    pub fn new(buf: &'a [u8], limits: LimitsConfig) -> Self {
        Self {
            buf,
            offset: 0,
            limits,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for FrameIter<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.buf.len() {
            return None;
        }
        match Frame::from_bytes_with_limits(&self.buf[self.offset..], &self.limits) {
            Ok((frame, consumed)) => {
                self.offset += consumed;
                Some(Ok(frame))
            }
            Err(e) => {
                self.offset = self.buf.len();
                Some(Err(e))
            }
        }
    }
}

/// Decode every frame in `payload`; all or nothing.
pub fn decode_frames(payload: &[u8]) -> Result<Vec<Frame>> {
    Frame::iter(payload).collect()
}

/// Encode `frames` back to back.
pub fn encode_frames(frames: &[Frame]) -> Vec<u8> {
    let len = frames.iter().map(Frame::encoded_len).sum();
    let mut out = Vec::with_capacity(len);
    for frame in frames {
        frame.encode(&mut out);
    }
    out
}
