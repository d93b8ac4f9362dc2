//! Byte-exact reference vectors for every control frame.
//!
//! Each test checks the exact encoding, the type byte, and that decoding the
//! bytes yields an equal frame while consuming the whole buffer.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use quic_wire::{
    BlockedFrame, ConnectionCloseFrame, Frame, FrameType, GoAwayFrame, PaddingFrame, PingFrame,
    QuicError, ResetStreamFrame, StreamId, WindowUpdateFrame, WireFrame,
};

const INVALID_STATE: &[u8] = b"Connection has reached an invalid state.";

fn assert_roundtrip<F>(frame: &F, expected: &[u8])
where
    F: WireFrame + PartialEq + std::fmt::Debug,
{
    let bytes = frame.to_bytes();
    assert_eq!(bytes, expected);
    assert_eq!(frame.encoded_len(), expected.len());

    let (decoded, consumed) = F::from_bytes(&bytes).expect("decode");
    assert_eq!(&decoded, frame);
    assert_eq!(consumed, expected.len());
}

#[test]
fn test_padding_frame() {
    let frame = PaddingFrame::new();
    assert_eq!(PaddingFrame::FRAME_TYPE.to_byte(), 0);
    assert_roundtrip(&frame, &[0x00]);
}

#[test]
fn test_reset_stream_frame() {
    let frame = ResetStreamFrame::new(
        StreamId::from_id(1),
        [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08],
        QuicError::new(1),
    );
    assert_eq!(ResetStreamFrame::FRAME_TYPE.to_byte(), 1);
    assert_roundtrip(
        &frame,
        &[
            0x01, //
            0x01, 0x00, 0x00, 0x00, //
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, //
            0x01, 0x00, 0x00, 0x00,
        ],
    );
    assert_eq!(frame.to_bytes().len(), 17);
}

#[test]
fn test_connection_close_frame_no_error() {
    let frame = ConnectionCloseFrame::new(QuicError::new(0));
    assert_eq!(ConnectionCloseFrame::FRAME_TYPE.to_byte(), 2);
    assert_roundtrip(&frame, &[0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn test_connection_close_frame_internal_error() {
    let frame = ConnectionCloseFrame::new(QuicError::new(1));

    let mut expected = vec![0x02, 0x01, 0x00, 0x00, 0x00, 0x28, 0x00];
    expected.extend_from_slice(INVALID_STATE);
    assert_roundtrip(&frame, &expected);
}

#[test]
fn test_goaway_frame_no_error() {
    let frame = GoAwayFrame::new(QuicError::new(0), StreamId::from_id(7));
    assert_eq!(GoAwayFrame::FRAME_TYPE.to_byte(), 3);
    assert_roundtrip(
        &frame,
        &[
            0x03, //
            0x00, 0x00, 0x00, 0x00, //
            0x07, 0x00, 0x00, 0x00, //
            0x00, 0x00,
        ],
    );
}

#[test]
fn test_goaway_frame_internal_error() {
    let frame = GoAwayFrame::new(QuicError::new(1), StreamId::from_id(7));

    let mut expected = vec![
        0x03, //
        0x01, 0x00, 0x00, 0x00, //
        0x07, 0x00, 0x00, 0x00, //
        0x28, 0x00,
    ];
    expected.extend_from_slice(INVALID_STATE);
    assert_roundtrip(&frame, &expected);
}

#[test]
fn test_window_update_frame() {
    let frame = WindowUpdateFrame::new(
        StreamId::from_id(0),
        [0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00],
    );
    assert_eq!(WindowUpdateFrame::FRAME_TYPE.to_byte(), 4);
    assert_roundtrip(
        &frame,
        &[
            0x04, //
            0x00, 0x00, 0x00, 0x00, //
            0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00,
        ],
    );
}

#[test]
fn test_blocked_frame() {
    let frame = BlockedFrame::new(StreamId::from_id(3));
    assert_roundtrip(&frame, &[0x05, 0x03, 0x00, 0x00, 0x00]);
}

#[test]
fn test_ping_frame() {
    assert_roundtrip(&PingFrame::new(), &[0x07]);
}

#[test]
fn test_sum_type_dispatch() {
    let cases: Vec<(Frame, FrameType)> = vec![
        (PaddingFrame::new().into(), FrameType::Padding),
        (
            ResetStreamFrame::new(StreamId::from_id(1), [0; 8], QuicError::new(1)).into(),
            FrameType::ResetStream,
        ),
        (
            ConnectionCloseFrame::new(QuicError::new(1)).into(),
            FrameType::ConnectionClose,
        ),
        (
            GoAwayFrame::new(QuicError::new(0), StreamId::from_id(7)).into(),
            FrameType::GoAway,
        ),
        (
            WindowUpdateFrame::new(StreamId::from_id(0), [0xff; 8]).into(),
            FrameType::WindowUpdate,
        ),
        (
            BlockedFrame::new(StreamId::from_id(2)).into(),
            FrameType::Blocked,
        ),
        (PingFrame::new().into(), FrameType::Ping),
    ];

    for (frame, frame_type) in cases {
        assert_eq!(frame.frame_type(), frame_type);
        let bytes = frame.to_bytes();
        assert_eq!(bytes[0], frame_type.to_byte());

        let (decoded, consumed) = Frame::from_bytes(&bytes).expect("decode");
        assert_eq!(decoded, frame);
        assert_eq!(consumed, bytes.len());
    }
}
