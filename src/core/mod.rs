//! # Core Wire Components
//!
//! Low-level primitives shared by every codec in the crate.
//!
//! ## Components
//! - **Wire**: bounds-checked little-endian reader
//! - **StreamId**: fixed 4-byte stream identifiers
//! - **Codec**: `tokio_util` codecs for frames and tag messages on a byte stream
//!
//! ## Security
//! - Every fixed-width read is length-checked before it happens
//! - Tag messages are bounded by entry count and total size before buffering

pub mod codec;
pub mod stream_id;
pub mod wire;
