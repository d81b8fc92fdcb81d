/// Header payload decoding module
///
/// Turns raw ChromeLogger / ChromePHP response headers into decoded
/// payloads ready for formatting.
///
/// # Architecture
///
/// - `header.rs`: Fragment aggregation per header name
/// - `payload.rs`: base64 → UTF-8 → JSON decoding and column coercion
/// - `model.rs`: Headers, payloads and decode errors
/// - `metrics.rs`: Pipeline activity counters
///
/// # Safety Guarantees
///
/// - Bounded memory (blob size limit before decoding)
/// - Binary safety (non-UTF8 payloads are rejected, never panic)
/// - A bad blob only drops itself

pub mod header;
pub mod metrics;
pub mod model;
pub mod payload;

// Re-export commonly used types
pub use header::{aggregate, is_recognized};
pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use model::{BlobFailure, DecodeError, HeaderGroup, LogPayload, LogValue, RawHeader};
pub use payload::{decode, PayloadDecoder};

// Constants
pub const RECOGNIZED_HEADER_PREFIXES: [&str; 2] = ["x-chromelogger-data", "x-chromephp-data"];
pub const DEFAULT_COLUMNS: [&str; 3] = ["log", "backtrace", "type"];
pub const MAX_BLOB_SIZE: usize = 1_048_576; // 1MB
