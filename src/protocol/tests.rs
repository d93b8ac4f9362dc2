// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::core::stream_id::StreamId;
use crate::protocol::error_code::QuicError;
use crate::protocol::frame::*;
use crate::protocol::tag::{tags, QuicTag};

#[test]
fn test_packet_payload_walk() {
    // =================== Sender builds a payload ===================
    let frames: Vec<Frame> = vec![
        WindowUpdateFrame::new(StreamId::from_id(0), [0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]).into(),
        ResetStreamFrame::new(StreamId::from_id(5), [0, 0, 1, 0, 0, 0, 0, 0], QuicError::new(6))
            .into(),
        GoAwayFrame::new(QuicError::new(16), StreamId::from_id(5)).into(),
        PaddingFrame::new().into(),
        PaddingFrame::new().into(),
    ];
    let payload = encode_frames(&frames);

    // =================== Receiver walks it frame by frame ===================
    let mut offset = 0;
    let mut seen = Vec::new();
    while offset < payload.len() {
        let (frame, consumed) =
            Frame::from_bytes(&payload[offset..]).expect("each frame should decode");
        offset += consumed;
        seen.push(frame);
    }

    assert_eq!(offset, payload.len());
    assert_eq!(seen, frames);
    assert_eq!(decode_frames(&payload).unwrap(), frames);
}

#[test]
fn test_truncated_payload_yields_no_partial_frames() {
    let frames: Vec<Frame> = vec![
        PingFrame::new().into(),
        ConnectionCloseFrame::new(QuicError::new(1)).into(),
    ];
    let payload = encode_frames(&frames);

    // Every strict prefix that cuts the close frame must fail as a whole
    for cut in 2..payload.len() {
        assert!(
            decode_frames(&payload[..cut]).is_err(),
            "prefix of {cut} bytes should not decode"
        );
    }
}

#[test]
fn test_public_reset_message() {
    let nonce_proof = [0x89, 0x67, 0x45, 0x23, 0x01, 0xEF, 0xCD, 0xAB];
    let rejected_seq = [0xBC, 0x9A, 0x78, 0x56, 0x34, 0x12, 0x00, 0x00];
    let client_addr = [0x02, 0x00, 0x7F, 0x00, 0x00, 0x01, 0x39, 0x30];

    let mut reset = QuicTag::new(tags::PRST);
    reset
        .set_tag(tags::RNON, nonce_proof.to_vec())
        .set_tag(tags::RSEQ, rejected_seq.to_vec())
        .set_tag(tags::CADR, client_addr.to_vec());

    let bytes = reset.to_bytes().expect("encode");
    let (decoded, consumed) = QuicTag::decode(&bytes).expect("decode");

    assert_eq!(consumed, bytes.len());
    assert_eq!(decoded.name(), tags::PRST);
    assert_eq!(
        decoded.keys().collect::<Vec<_>>(),
        vec![tags::RNON, tags::RSEQ, tags::CADR]
    );
    assert_eq!(decoded.get(&tags::CADR).unwrap().as_ref(), &client_addr);
    assert_eq!(decoded, reset);
}

#[test]
fn test_close_reason_matches_error_table() {
    for code in [0u32, 1, 16, 25, 90, 12345] {
        let frame = ConnectionCloseFrame::new(QuicError::new(code));
        let (decoded, _) = ConnectionCloseFrame::from_bytes(&frame.to_bytes()).unwrap();
        assert_eq!(decoded.error.reason(), QuicError::new(code).reason());
        assert_eq!(decoded, frame);
    }
}
