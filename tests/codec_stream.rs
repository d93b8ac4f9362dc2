//! Streaming codec tests over an async byte pipe

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use quic_wire::utils::CodecMetrics;
use quic_wire::{
    tags, ConnectionCloseFrame, Frame, FrameCodec, GoAwayFrame, PingFrame, QuicError, QuicTag,
    StreamId, TagCodec, WindowUpdateFrame,
};
use tokio::io::AsyncWriteExt;
use tokio_util::codec::{Decoder, FramedRead, FramedWrite};

fn sample_frames() -> Vec<Frame> {
    vec![
        WindowUpdateFrame::new(StreamId::from_id(5), [0, 0, 1, 0, 0, 0, 0, 0]).into(),
        PingFrame::new().into(),
        GoAwayFrame::new(QuicError::new(16), StreamId::from_id(5)).into(),
        ConnectionCloseFrame::new(QuicError::new(1)).into(),
    ]
}

#[tokio::test]
async fn test_frames_over_duplex() {
    let (client, server) = tokio::io::duplex(64);
    let metrics = Arc::new(CodecMetrics::new());

    let frames = sample_frames();
    let expected = frames.clone();
    let writer_metrics = metrics.clone();
    let writer = tokio::spawn(async move {
        let mut sink = FramedWrite::new(client, FrameCodec::new().with_metrics(writer_metrics));
        for frame in frames {
            sink.send(frame).await.unwrap();
        }
    });

    let mut stream = FramedRead::new(server, FrameCodec::new().with_metrics(metrics.clone()));
    let mut received = Vec::new();
    while received.len() < expected.len() {
        let frame = stream.next().await.expect("stream ended").expect("decode");
        received.push(frame);
    }
    writer.await.unwrap();

    assert_eq!(received, expected);
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.frames_encoded, 4);
    assert_eq!(snapshot.frames_decoded, 4);
    assert_eq!(snapshot.decode_errors, 0);
}

#[tokio::test]
async fn test_byte_at_a_time_input() {
    let (mut client, server) = tokio::io::duplex(1);
    let payload = quic_wire::encode_frames(&sample_frames());

    let writer = tokio::spawn(async move {
        for byte in payload {
            client.write_all(&[byte]).await.unwrap();
        }
    });

    let frames: Vec<Frame> = FramedRead::new(server, FrameCodec::new())
        .map(|r| r.expect("decode"))
        .collect()
        .await;
    writer.await.unwrap();

    assert_eq!(frames, sample_frames());
}

#[tokio::test]
async fn test_tags_over_duplex() {
    let (client, server) = tokio::io::duplex(32);

    let mut hello = QuicTag::new(tags::CHLO);
    hello
        .set_tag(tags::VER, &b"Q039"[..])
        .set_tag(tags::SNI, &b"www.example.org"[..])
        .set_tag(tags::PAD, vec![0u8; 200]);
    let mut reset = QuicTag::new(tags::PRST);
    reset.set_tag(tags::RNON, vec![7u8; 8]);

    let sent = vec![hello, reset];
    let to_send = sent.clone();
    let writer = tokio::spawn(async move {
        let mut sink = FramedWrite::new(client, TagCodec::new());
        for tag in &to_send {
            sink.send(tag).await.unwrap();
        }
    });

    let received: Vec<QuicTag> = FramedRead::new(server, TagCodec::new())
        .map(|r| r.expect("decode"))
        .collect()
        .await;
    writer.await.unwrap();

    assert_eq!(received, sent);
}

#[test]
fn test_decode_error_does_not_consume() {
    let mut codec = FrameCodec::new();
    let mut buf = BytesMut::from(&[0x07u8, 0x42, 0x07][..]);

    assert_eq!(codec.decode(&mut buf).unwrap(), Some(Frame::Ping(PingFrame)));
    assert!(codec.decode(&mut buf).is_err());
    assert_eq!(&buf[..], &[0x42, 0x07]);
}
