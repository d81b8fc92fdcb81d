use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

use super::model::DecodeError;

/// Decode failure categories for metrics recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailureKind {
    /// Blob exceeded the decoder size limit
    TooLarge,
    /// Invalid base64 text
    Base64,
    /// Decoded bytes were not UTF-8
    NonUtf8,
    /// JSON syntax error or non-object payload
    Json,
}

impl From<&DecodeError> for DecodeFailureKind {
    fn from(error: &DecodeError) -> Self {
        match error {
            DecodeError::TooLarge(_, _) => Self::TooLarge,
            DecodeError::Base64(_) => Self::Base64,
            DecodeError::NonUtf8(_) => Self::NonUtf8,
            DecodeError::Json(_) | DecodeError::NotAnObject => Self::Json,
        }
    }
}

/// A wrapper that forces the wrapped data onto its own cache line.
///
/// Concurrent pipeline runs update different counter groups; keeping each
/// group on a separate 64-byte line avoids false sharing between cores.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// Header and blob counters (updated once per header group)
#[derive(Debug, Default)]
pub struct BlobMetrics {
    pub batches: AtomicU64,
    pub groups: AtomicU64,
    pub decoded: AtomicU64,
}

/// Row counters (hottest path - updated per row)
#[derive(Debug, Default)]
pub struct RowMetrics {
    pub rows: AtomicU64,
    pub calls: AtomicU64,
    pub asserts_filtered: AtomicU64,
}

/// Decode failure counters by kind
#[derive(Debug, Default)]
pub struct FailureMetrics {
    pub too_large: AtomicU64,
    pub base64: AtomicU64,
    pub non_utf8: AtomicU64,
    pub json: AtomicU64,
}

/// Pipeline activity counters.
///
/// All operations use `Ordering::Relaxed`; counters are observability only
/// and never influence pipeline output. `snapshot()` is not atomic across
/// fields.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    pub blobs: CacheAligned<BlobMetrics>,
    pub rows: CacheAligned<RowMetrics>,
    pub failures: CacheAligned<FailureMetrics>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one header batch and how many groups it aggregated into
    #[inline]
    pub fn record_batch(&self, groups: usize) {
        self.blobs.0.batches.fetch_add(1, Ordering::Relaxed);
        self.blobs.0.groups.fetch_add(groups as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_decoded(&self) {
        self.blobs.0.decoded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failure(&self, kind: DecodeFailureKind) {
        let counter = match kind {
            DecodeFailureKind::TooLarge => &self.failures.0.too_large,
            DecodeFailureKind::Base64 => &self.failures.0.base64,
            DecodeFailureKind::NonUtf8 => &self.failures.0.non_utf8,
            DecodeFailureKind::Json => &self.failures.0.json,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of transforming one payload
    #[inline]
    pub fn record_rows(&self, rows: usize, calls: usize) {
        self.rows.0.rows.fetch_add(rows as u64, Ordering::Relaxed);
        self.rows.0.calls.fetch_add(calls as u64, Ordering::Relaxed);
        // Filtered asserts are the only rows that produce no call
        let filtered = rows.saturating_sub(calls) as u64;
        if filtered > 0 {
            self.rows.0.asserts_filtered.fetch_add(filtered, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let failures = &self.failures.0;
        let too_large = failures.too_large.load(Ordering::Relaxed);
        let base64 = failures.base64.load(Ordering::Relaxed);
        let non_utf8 = failures.non_utf8.load(Ordering::Relaxed);
        let json = failures.json.load(Ordering::Relaxed);

        MetricsSnapshot {
            batches: self.blobs.0.batches.load(Ordering::Relaxed),
            header_groups: self.blobs.0.groups.load(Ordering::Relaxed),
            blobs_decoded: self.blobs.0.decoded.load(Ordering::Relaxed),
            rows: self.rows.0.rows.load(Ordering::Relaxed),
            calls_emitted: self.rows.0.calls.load(Ordering::Relaxed),
            asserts_filtered: self.rows.0.asserts_filtered.load(Ordering::Relaxed),
            decode_failures_total: too_large + base64 + non_utf8 + json,
            decode_failures_too_large: too_large,
            decode_failures_base64: base64,
            decode_failures_non_utf8: non_utf8,
            decode_failures_json: json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub batches: u64,
    pub header_groups: u64,
    pub blobs_decoded: u64,
    pub rows: u64,
    pub calls_emitted: u64,
    pub asserts_filtered: u64,
    pub decode_failures_total: u64,
    pub decode_failures_too_large: u64,
    pub decode_failures_base64: u64,
    pub decode_failures_non_utf8: u64,
    pub decode_failures_json: u64,
}
