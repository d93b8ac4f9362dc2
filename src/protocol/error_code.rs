//! # Error Codes
//!
//! Static catalogue of connection/stream error codes and their reason phrases,
//! plus [`QuicError`], the `(code, reason)` pair carried by error-bearing frames.
//!
//! The table is compiled in and read-only, so lookups need no synchronization.
//! Code `0` and codes missing from the table resolve to an empty reason.

use std::fmt;

use bytes::Bytes;

use crate::error::{Malformed, Result};

pub use crate::config::MAX_REASON_LENGTH;

/// One row of the error table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCodeEntry {
    pub code: u32,
    pub name: &'static str,
    pub reason: &'static str,
}

const fn entry(code: u32, name: &'static str, reason: &'static str) -> ErrorCodeEntry {
    ErrorCodeEntry { code, name, reason }
}

/// Error catalogue, sorted by code.
pub static ERROR_CODES: &[ErrorCodeEntry] = &[
    entry(0, "QUIC_NO_ERROR", ""),
    entry(1, "QUIC_INTERNAL_ERROR", "Connection has reached an invalid state."),
    entry(2, "QUIC_STREAM_DATA_AFTER_TERMINATION", "There were data frames after the a fin or reset."),
    entry(3, "QUIC_INVALID_PACKET_HEADER", "Control frame is malformed."),
    entry(4, "QUIC_INVALID_FRAME_DATA", "Frame data is malformed."),
    entry(5, "QUIC_INVALID_FEC_DATA", "FEC data is malformed."),
    entry(6, "QUIC_INVALID_RST_STREAM_DATA", "RST_STREAM frame data is malformed."),
    entry(7, "QUIC_INVALID_CONNECTION_CLOSE_DATA", "CONNECTION_CLOSE frame data is malformed."),
    entry(8, "QUIC_INVALID_GOAWAY_DATA", "GOAWAY frame data is malformed."),
    entry(9, "QUIC_INVALID_ACK_DATA", "ACK frame data is malformed."),
    entry(10, "QUIC_INVALID_VERSION_NEGOTIATION_PACKET", "Version negotiation packet is malformed."),
    entry(11, "QUIC_INVALID_PUBLIC_RST_PACKET", "Public RST packet is malformed."),
    entry(12, "QUIC_DECRYPTION_FAILURE", "There was an error decrypting."),
    entry(13, "QUIC_ENCRYPTION_FAILURE", "There was an error encrypting."),
    entry(14, "QUIC_PACKET_TOO_LARGE", "The packet exceeded kMaxPacketSize."),
    entry(16, "QUIC_PEER_GOING_AWAY", "The peer is going away. May be a client or server."),
    entry(17, "QUIC_INVALID_STREAM_ID", "A stream ID was invalid."),
    entry(18, "QUIC_TOO_MANY_OPEN_STREAMS", "Too many streams already open."),
    entry(19, "QUIC_PUBLIC_RESET", "Received public reset for this connection."),
    entry(20, "QUIC_INVALID_VERSION", "Invalid protocol version."),
    entry(22, "QUIC_INVALID_HEADER_ID", "The Header ID for a stream was too far from the previous."),
    entry(23, "QUIC_INVALID_NEGOTIATED_VALUE", "Negotiable parameter received during handshake had invalid value."),
    entry(24, "QUIC_DECOMPRESSION_FAILURE", "There was an error decompressing data."),
    entry(25, "QUIC_NETWORK_IDLE_TIMEOUT", "The connection timed out due to no network activity."),
    entry(26, "QUIC_ERROR_MIGRATING_ADDRESS", "There was an error encountered migrating addresses."),
    entry(27, "QUIC_PACKET_WRITE_ERROR", "There was an error while writing to the socket."),
    entry(28, "QUIC_HANDSHAKE_FAILED", "There was an error during the handshake."),
    entry(29, "QUIC_CRYPTO_TAGS_OUT_OF_ORDER", "Handshake message contained out of order tags."),
    entry(30, "QUIC_CRYPTO_TOO_MANY_ENTRIES", "Handshake message contained too many entries."),
    entry(31, "QUIC_CRYPTO_INVALID_VALUE_LENGTH", "Handshake message contained an invalid value length."),
    entry(32, "QUIC_CRYPTO_MESSAGE_AFTER_HANDSHAKE_COMPLETE", "A crypto message was received after the handshake was complete."),
    entry(33, "QUIC_INVALID_CRYPTO_MESSAGE_TYPE", "A crypto message was received with an illegal message tag."),
    entry(34, "QUIC_INVALID_CRYPTO_MESSAGE_PARAMETER", "A crypto message was received with an illegal parameter."),
    entry(35, "QUIC_CRYPTO_MESSAGE_PARAMETER_NOT_FOUND", "A crypto message was received with a mandatory parameter missing."),
    entry(36, "QUIC_CRYPTO_MESSAGE_PARAMETER_NO_OVERLAP", "A crypto message was received with a parameter that has no overlap with the local parameter."),
    entry(37, "QUIC_CRYPTO_MESSAGE_INDEX_NOT_FOUND", "A crypto message was received that contained a parameter with too few values."),
    entry(38, "QUIC_CRYPTO_INTERNAL_ERROR", "An internal error occurred in crypto processing."),
    entry(39, "QUIC_CRYPTO_VERSION_NOT_SUPPORTED", "A crypto handshake message specified an unsupported version."),
    entry(40, "QUIC_CRYPTO_NO_SUPPORT", "There was no intersection between the crypto primitives supported by the peer and ourselves."),
    entry(41, "QUIC_CRYPTO_TOO_MANY_REJECTS", "The server rejected our client hello messages too many times."),
    entry(42, "QUIC_PROOF_INVALID", "The client rejected the server's certificate chain or signature."),
    entry(43, "QUIC_CRYPTO_DUPLICATE_TAG", "A crypto message was received with a duplicate tag."),
    entry(44, "QUIC_CRYPTO_ENCRYPTION_LEVEL_INCORRECT", "A crypto message was received with the wrong encryption level (i.e. it should have been encrypted but was not.)"),
    entry(45, "QUIC_CRYPTO_SERVER_CONFIG_EXPIRED", "The server config for a server has expired."),
    entry(46, "QUIC_INVALID_STREAM_DATA", "STREAM frame data is malformed."),
    entry(48, "QUIC_MISSING_PAYLOAD", "The packet contained no payload."),
    entry(49, "QUIC_INVALID_PRIORITY", "A priority was invalid."),
    entry(50, "QUIC_EMPTY_STREAM_FRAME_NO_FIN", "We received a STREAM_FRAME with no data and no fin flag set."),
    entry(51, "QUIC_PACKET_READ_ERROR", "There was an error while reading from the socket."),
    entry(52, "QUIC_INVALID_CHANNEL_ID_SIGNATURE", "The channel ID signature was invalid."),
    entry(53, "QUIC_CRYPTO_SYMMETRIC_KEY_SETUP_FAILED", "We failed to setup the symmetric keys for a connection."),
    entry(54, "QUIC_CRYPTO_MESSAGE_WHILE_VALIDATING_CLIENT_HELLO", "A handshake message arrived, but we are still validating the previous handshake message."),
    entry(55, "QUIC_VERSION_NEGOTIATION_MISMATCH", "This connection involved a version negotiation which appears to have been tampered with."),
    entry(56, "QUIC_INVALID_HEADERS_STREAM_DATA", "We received invalid data on the headers stream."),
    entry(57, "QUIC_INVALID_WINDOW_UPDATE_DATA", "WINDOW_UPDATE frame data is malformed."),
    entry(58, "QUIC_INVALID_BLOCKED_DATA", "BLOCKED frame data is malformed."),
    entry(59, "QUIC_FLOW_CONTROL_RECEIVED_TOO_MUCH_DATA", "The peer received too much data, violating flow control."),
    entry(60, "QUIC_INVALID_STOP_WAITING_DATA", "STOP_WAITING frame data is malformed."),
    entry(61, "QUIC_UNENCRYPTED_STREAM_DATA", "Received STREAM frame data is not encrypted."),
    entry(62, "QUIC_CONNECTION_IP_POOLED", "The connection has been IP pooled into an existing connection."),
    entry(63, "QUIC_FLOW_CONTROL_SENT_TOO_MUCH_DATA", "The peer sent too much data, violating flow control."),
    entry(64, "QUIC_FLOW_CONTROL_INVALID_WINDOW", "The peer received an invalid flow control window."),
    entry(65, "QUIC_CRYPTO_UPDATE_BEFORE_HANDSHAKE_COMPLETE", "A server config update arrived before the handshake is complete."),
    entry(67, "QUIC_HANDSHAKE_TIMEOUT", "The connection timed out waiting for the handshake to complete."),
    entry(68, "QUIC_TOO_MANY_OUTSTANDING_SENT_PACKETS", "There were too many packets sent without being acked."),
    entry(69, "QUIC_TOO_MANY_OUTSTANDING_RECEIVED_PACKETS", "There were too many packets received that were not yet acked."),
    entry(70, "QUIC_CONNECTION_CANCELLED", "The quic connection has been cancelled."),
    entry(71, "QUIC_BAD_PACKET_LOSS_RATE", "Disabled QUIC because of high packet loss rate."),
    entry(72, "QUIC_CRYPTO_HANDSHAKE_STATELESS_REJECT", "The handshake was rejected statelessly."),
    entry(73, "QUIC_PUBLIC_RESETS_POST_HANDSHAKE", "Disabled QUIC because of too many public resets post handshake."),
    entry(74, "QUIC_TIMEOUTS_WITH_OPEN_STREAMS", "Disabled QUIC because of too many timeouts with streams open."),
    entry(75, "QUIC_FAILED_TO_SERIALIZE_PACKET", "Closed because we failed to serialize a packet."),
    entry(76, "QUIC_TOO_MANY_AVAILABLE_STREAMS", "The peer created too many available streams."),
    entry(77, "QUIC_UNENCRYPTED_FEC_DATA", "Received FEC data is not encrypted."),
    entry(78, "QUIC_INVALID_PATH_CLOSE_DATA", "PATH_CLOSE frame data is malformed."),
    entry(79, "QUIC_BAD_MULTIPATH_FLAG", "Received a packet with an invalid multipath flag."),
    entry(80, "QUIC_IP_ADDRESS_CHANGED", "IP address changed causing connection close."),
    entry(81, "QUIC_CONNECTION_MIGRATION_NO_MIGRATABLE_STREAMS", "Network changed, but connection had no migratable streams."),
    entry(82, "QUIC_CONNECTION_MIGRATION_TOO_MANY_CHANGES", "Connection changed networks too many times."),
    entry(83, "QUIC_CONNECTION_MIGRATION_NO_NEW_NETWORK", "Connection migration was attempted, but there was no new network to migrate to."),
    entry(84, "QUIC_CONNECTION_MIGRATION_NON_MIGRATABLE_STREAM", "Network changed, but connection had one or more non-migratable streams."),
    entry(85, "QUIC_TOO_MANY_RTOS", "Stream frames arrived too discontiguously so that stream sequencer buffer maintains too many gaps."),
    entry(86, "QUIC_ERROR_MIGRATING_PORT", "There was an error encountered migrating port only."),
    entry(87, "QUIC_OVERLAPPING_STREAM_DATA", "STREAM frame data overlaps with buffered data."),
    entry(88, "QUIC_ATTEMPT_TO_SEND_UNENCRYPTED_STREAM_DATA", "Attempt to send unencrypted STREAM frame."),
    entry(89, "QUIC_MAYBE_CORRUPTED_MEMORY", "FEC related errors."),
    entry(90, "QUIC_CRYPTO_CHLO_TOO_LARGE", "The client hello message was too large."),
];

fn find(code: u32) -> Option<&'static ErrorCodeEntry> {
    ERROR_CODES
        .binary_search_by_key(&code, |e| e.code)
        .ok()
        .map(|i| &ERROR_CODES[i])
}

/// Reason phrase for `code`; empty for code 0 and for unknown codes.
pub fn lookup(code: u32) -> &'static str {
    find(code).map_or("", |e| e.reason)
}

/// Symbolic name for `code`; empty for unknown codes.
pub fn name_of(code: u32) -> &'static str {
    find(code).map_or("", |e| e.name)
}

/// Code for a symbolic name such as `"QUIC_INTERNAL_ERROR"`.
pub fn code_of(name: &str) -> Option<u32> {
    ERROR_CODES.iter().find(|e| e.name == name).map(|e| e.code)
}

/// A numeric error code paired with its reason phrase.
///
/// Locally built errors take the phrase from the table. Errors decoded off the
/// wire keep whatever phrase the peer sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuicError {
    code: u32,
    reason: Bytes,
}

impl QuicError {
    pub fn new(code: u32) -> Self {
        Self {
            code,
            reason: Bytes::from_static(lookup(code).as_bytes()),
        }
    }

    /// Build with an explicit reason phrase, e.g. one read off the wire.
    pub fn with_reason(code: u32, reason: impl Into<Bytes>) -> Result<Self> {
        let reason = reason.into();
        if reason.len() > MAX_REASON_LENGTH {
            return Err(Malformed::ReasonTooLong {
                length: reason.len(),
                max: MAX_REASON_LENGTH,
            }
            .into());
        }
        Ok(Self { code, reason })
    }

    pub fn from_name(name: &str) -> Option<Self> {
        code_of(name).map(Self::new)
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn reason(&self) -> &[u8] {
        &self.reason
    }

    /// Reason phrase as text, replacing invalid UTF-8.
    pub fn reason_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.reason)
    }

    pub fn name(&self) -> &'static str {
        name_of(self.code)
    }

    /// True when the code appears in the error table.
    pub fn is_known(&self) -> bool {
        find(self.code).is_some()
    }

    pub fn is_no_error(&self) -> bool {
        self.code == 0
    }

    pub(crate) fn reason_len(&self) -> u16 {
        // bounded by MAX_REASON_LENGTH at construction
        self.reason.len() as u16
    }
}

impl Default for QuicError {
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<u32> for QuicError {
    fn from(code: u32) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for QuicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name().is_empty() {
            "QUIC_UNKNOWN_ERROR"
        } else {
            self.name()
        };
        if self.reason.is_empty() {
            write!(f, "{name} ({})", self.code)
        } else {
            write!(f, "{name} ({}): {}", self.code, self.reason_lossy())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::ProtocolError;

    #[test]
    fn table_is_sorted_and_unique() {
        assert!(ERROR_CODES.windows(2).all(|w| w[0].code < w[1].code));
    }

    #[test]
    fn code_zero_has_empty_reason() {
        assert_eq!(QuicError::new(0).reason(), b"");
        assert!(QuicError::new(0).is_no_error());
    }

    #[test]
    fn internal_error_reason() {
        let err = QuicError::new(1);
        assert_eq!(err.reason(), b"Connection has reached an invalid state.");
        assert_eq!(err.reason().len(), 0x28);
        assert_eq!(err.name(), "QUIC_INTERNAL_ERROR");
    }

    #[test]
    fn unknown_code_degrades_to_empty_reason() {
        let err = QuicError::new(0xDEAD_BEEF);
        assert!(err.reason().is_empty());
        assert!(err.name().is_empty());
        assert!(!err.is_known());
        assert_eq!(err.to_string(), format!("QUIC_UNKNOWN_ERROR ({})", 0xDEAD_BEEFu32));
    }

    #[test]
    fn from_name_round_trips_code() {
        let err = QuicError::from_name("QUIC_PEER_GOING_AWAY").unwrap();
        assert_eq!(err.code(), 16);
        assert!(QuicError::from_name("NOT_A_CODE").is_none());
    }

    #[test]
    fn custom_reason_is_kept() {
        let err = QuicError::with_reason(1, &b"bye"[..]).unwrap();
        assert_eq!(err.reason(), b"bye");
        assert_ne!(err, QuicError::new(1));
    }

    #[test]
    fn oversized_reason_rejected() {
        let big = vec![b'x'; MAX_REASON_LENGTH + 1];
        assert!(matches!(
            QuicError::with_reason(1, big),
            Err(ProtocolError::MalformedFrame(Malformed::ReasonTooLong {
                length: 65536,
                max: 65535
            }))
        ));
    }

    #[test]
    fn display_includes_name_and_reason() {
        assert_eq!(
            QuicError::new(1).to_string(),
            "QUIC_INTERNAL_ERROR (1): Connection has reached an invalid state."
        );
        assert_eq!(QuicError::new(0).to_string(), "QUIC_NO_ERROR (0)");
    }
}
