//! # quic-wire
//!
//! Wire-format layer of a QUIC-family transport: converts control frames and
//! tagged handshake messages between their in-memory form and their exact
//! bytes on the network.
//!
//! All encode/decode functions are pure and synchronous. They touch only their
//! own input and never share mutable state, so independent buffers can be
//! decoded on any number of threads at once.
//!
//! ## Example
//! ```rust
//! use quic_wire::{Frame, GoAwayFrame, QuicError, StreamId, WireFrame};
//!
//! let frame = GoAwayFrame::new(QuicError::new(0), StreamId::from_id(7));
//! let bytes = frame.to_bytes();
//! assert_eq!(bytes, [0x03, 0, 0, 0, 0, 7, 0, 0, 0, 0, 0]);
//!
//! let (decoded, consumed) = Frame::from_bytes(&bytes).unwrap();
//! assert_eq!(decoded, Frame::GoAway(frame));
//! assert_eq!(consumed, bytes.len());
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::config::{CodecConfig, LimitsConfig, LoggingConfig};
pub use crate::core::codec::{FrameCodec, TagCodec};
pub use crate::core::stream_id::StreamId;
pub use crate::error::{Malformed, ProtocolError, Result};
pub use crate::protocol::error_code::QuicError;
pub use crate::protocol::frame::{
    decode_frames, encode_frames, BlockedFrame, ConnectionCloseFrame, Frame, FrameIter, FrameType,
    GoAwayFrame, Offset, PaddingFrame, PingFrame, ResetStreamFrame, WindowUpdateFrame, WireFrame,
};
pub use crate::protocol::tag::{tags, QuicTag, Tag};
