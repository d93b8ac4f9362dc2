//! # Error Types
//!
//! Error handling for the wire-format layer.
//!
//! Every decode path in this crate is a pure function of its input buffer, so
//! every failure here is local and recoverable: the caller discards the
//! offending frame or packet and carries on.
//!
//! ## Error Categories
//! - **Malformed input**: truncated fields, unknown frame types, broken tag offsets
//! - **Encoding limits**: reason phrases or tag messages that cannot be represented
//! - **Configuration**: invalid or unreadable codec configuration
//! - **I/O**: surfaced only through the streaming codec seam
//!
//! ## Example Usage
//! ```rust
//! use quic_wire::error::{Malformed, ProtocolError};
//! use quic_wire::protocol::frame::Frame;
//!
//! match Frame::from_bytes(&[0x01, 0x00]) {
//!     Err(ProtocolError::MalformedFrame(Malformed::Truncated { .. })) => {}
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Configuration errors
    pub const ERR_CONFIG_OPEN: &str = "Failed to open config file";
    pub const ERR_CONFIG_READ: &str = "Failed to read config file";
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
    pub const ERR_CONFIG_SERIALIZE: &str = "Failed to serialize config";
    pub const ERR_CONFIG_WRITE: &str = "Failed to write config file";

    /// Logging errors
    pub const ERR_LOG_FILTER: &str = "Invalid log filter directive";

    /// Tag errors
    pub const ERR_TAG_LENGTH: &str = "Tag must be exactly 4 bytes";
}

/// Why a buffer failed to decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    #[error("buffer truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("unknown frame type 0x{0:02x}")]
    UnknownFrameType(u8),

    #[error("unexpected frame type 0x{found:02x} (expected 0x{expected:02x})")]
    UnexpectedFrameType { expected: u8, found: u8 },

    #[error("tag offsets not monotonic at entry {index}: {current} < {previous}")]
    OffsetsNotMonotonic {
        index: usize,
        previous: u32,
        current: u32,
    },

    #[error("tag payload overrun: needed {needed} bytes, {available} available")]
    PayloadOverrun { needed: usize, available: usize },

    #[error("too many tag entries: {count} (max {max})")]
    TooManyEntries { count: usize, max: usize },

    #[error("reason phrase too long: {length} bytes (max {max})")]
    ReasonTooLong { length: usize, max: usize },

    #[error("tag message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },
}

impl Malformed {
    /// True when more input could turn this failure into a successful decode.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            Malformed::Truncated { .. } | Malformed::PayloadOverrun { .. }
        )
    }
}

// ProtocolError is the primary error type for all codec operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] Malformed),

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Too many tag entries: {count} (max {max})")]
    TooManyEntries { count: usize, max: usize },

    #[error("Tag payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ProtocolError {
    /// The decode failure reason, if this error came from a decoder.
    pub fn malformed(&self) -> Option<&Malformed> {
        match self {
            ProtocolError::MalformedFrame(m) => Some(m),
            _ => None,
        }
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
