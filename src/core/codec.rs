//! Streaming codecs for `tokio_util::codec`.
//!
//! [`FrameCodec`] and [`TagCodec`] let a framed reader/writer pull frames or
//! tag messages out of a growing byte buffer. Truncated input is reported as
//! `Ok(None)` and leaves the buffer untouched, so the caller can read more and
//! retry; every other malformation is an error.

use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::config::LimitsConfig;
use crate::error::{Malformed, ProtocolError, Result};
use crate::protocol::frame::Frame;
use crate::protocol::tag::QuicTag;
use crate::utils::metrics::CodecMetrics;

/// Codec for control frames.
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    limits: LimitsConfig,
    metrics: Arc<CodecMetrics>,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: LimitsConfig) -> Self {
        Self {
            limits,
            metrics: Arc::default(),
        }
    }

    /// Record into a shared metrics collector.
    pub fn with_metrics(mut self, metrics: Arc<CodecMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<CodecMetrics> {
        &self.metrics
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        if src.is_empty() {
            return Ok(None);
        }

        match Frame::from_bytes_with_limits(&src[..], &self.limits) {
            Ok((frame, consumed)) => {
                src.advance(consumed);
                self.metrics.frame_decoded(consumed);
                Ok(Some(frame))
            }
            Err(ProtocolError::MalformedFrame(Malformed::Truncated { needed, .. })) => {
                src.reserve(needed.saturating_sub(src.len()));
                Ok(None)
            }
            Err(e) => {
                self.metrics.decode_error();
                Err(e)
            }
        }
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(item.encoded_len());
        item.encode(dst);
        self.metrics.frame_encoded();
        Ok(())
    }
}

/// Codec for tag messages carried on a byte stream.
///
/// Enforces `max_tag_entries` and `max_tag_message_size` from [`LimitsConfig`].
#[derive(Debug, Clone, Default)]
pub struct TagCodec {
    limits: LimitsConfig,
    metrics: Arc<CodecMetrics>,
}

impl TagCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: LimitsConfig) -> Self {
        Self {
            limits,
            metrics: Arc::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<CodecMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<CodecMetrics> {
        &self.metrics
    }

    fn too_large(&self, size: usize) -> ProtocolError {
        self.metrics.decode_error();
        debug!(size, max = self.limits.max_tag_message_size, "tag message over size limit");
        Malformed::MessageTooLarge {
            size,
            max: self.limits.max_tag_message_size,
        }
        .into()
    }
}

impl Decoder for TagCodec {
    type Item = QuicTag;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<QuicTag>> {
        if src.is_empty() {
            return Ok(None);
        }

        match QuicTag::decode_with_limits(&src[..], &self.limits) {
            Ok((tag, consumed)) => {
                if consumed > self.limits.max_tag_message_size {
                    return Err(self.too_large(consumed));
                }
                src.advance(consumed);
                self.metrics.tag_decoded(consumed);
                Ok(Some(tag))
            }
            Err(ProtocolError::MalformedFrame(
                Malformed::Truncated { needed, .. } | Malformed::PayloadOverrun { needed, .. },
            )) => {
                if needed > self.limits.max_tag_message_size {
                    return Err(self.too_large(needed));
                }
                src.reserve(needed.saturating_sub(src.len()));
                Ok(None)
            }
            Err(e) => {
                self.metrics.decode_error();
                Err(e)
            }
        }
    }
}

impl Encoder<QuicTag> for TagCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: QuicTag, dst: &mut BytesMut) -> Result<()> {
        <Self as Encoder<&QuicTag>>::encode(self, &item, dst)
    }
}

impl<'a> Encoder<&'a QuicTag> for TagCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: &'a QuicTag, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(item.encoded_len());
        item.encode(dst)?;
        self.metrics.tag_encoded();
        Ok(())
    }
}
