//! Observability and Metrics
//!
//! Counters for the streaming codecs. A single `CodecMetrics` can be shared
//! between codecs through an `Arc`; the pure decode functions record nothing.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for codec operations
#[derive(Debug)]
pub struct CodecMetrics {
    /// Frames written by an encoder
    pub frames_encoded: AtomicU64,
    /// Frames produced by a decoder
    pub frames_decoded: AtomicU64,
    /// Tag messages written by an encoder
    pub tags_encoded: AtomicU64,
    /// Tag messages produced by a decoder
    pub tags_decoded: AtomicU64,
    /// Total bytes consumed by decoders
    pub bytes_decoded: AtomicU64,
    /// Inputs rejected as malformed
    pub decode_errors: AtomicU64,
    start_time: Instant,
}

impl CodecMetrics {
    pub fn new() -> Self {
        Self {
            frames_encoded: AtomicU64::new(0),
            frames_decoded: AtomicU64::new(0),
            tags_encoded: AtomicU64::new(0),
            tags_decoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn frame_encoded(&self) {
        self.frames_encoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frame_decoded(&self, byte_count: usize) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded
            .fetch_add(byte_count as u64, Ordering::Relaxed);
    }

    pub fn tag_encoded(&self) {
        self.tags_encoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tag_decoded(&self, byte_count: usize) {
        self.tags_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded
            .fetch_add(byte_count as u64, Ordering::Relaxed);
    }

    pub fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_encoded: self.frames_encoded.load(Ordering::Relaxed),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            tags_encoded: self.tags_encoded.load(Ordering::Relaxed),
            tags_decoded: self.tags_decoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            frames_encoded = snapshot.frames_encoded,
            frames_decoded = snapshot.frames_decoded,
            tags_encoded = snapshot.tags_encoded,
            tags_decoded = snapshot.tags_decoded,
            bytes_decoded = snapshot.bytes_decoded,
            decode_errors = snapshot.decode_errors,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_encoded: u64,
    pub frames_decoded: u64,
    pub tags_encoded: u64,
    pub tags_decoded: u64,
    pub bytes_decoded: u64,
    pub decode_errors: u64,
    pub uptime_seconds: u64,
}
