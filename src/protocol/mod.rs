//! # Protocol Structures
//!
//! Control frames, error codes and tagged handshake messages.
//!
//! ## Components
//! - **Frame**: encode/decode for each control frame kind, dispatched on the type byte
//! - **ErrorCode**: static `code -> reason` table and the `QuicError` value
//! - **Tag**: ordered tag/value messages packed with cumulative end offsets

pub mod error_code;
pub mod frame;
pub mod tag;

#[cfg(test)]
mod tests;
