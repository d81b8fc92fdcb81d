use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single log argument or row as carried by the payload JSON.
pub type LogValue = Value;

/// One physical transport header as delivered by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHeader {
    pub name: String,
    pub value: String,
}

impl RawHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// All fragments of one logical header, joined into a single encoded blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGroup {
    /// Header name as spelled on its first occurrence
    pub name: String,
    /// Concatenated base64 text with transport commas removed
    pub blob: String,
}

/// Decoded ChromeLogger payload
#[derive(Debug, Clone, Serialize)]
pub struct LogPayload {
    /// Lower-cased column names; row position `i` maps to `columns[i]`
    pub columns: Vec<String>,

    /// Raw rows, validated by the transformer
    pub rows: Vec<LogValue>,
}

impl LogPayload {
    pub fn new(columns: Vec<String>, rows: Vec<LogValue>) -> Self {
        Self { columns, rows }
    }

    pub fn default_columns() -> Vec<String> {
        super::DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect()
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Blob too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Non-UTF8 content: {0}")]
    NonUtf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,
}

/// A header group whose blob could not be decoded.
#[derive(Debug)]
pub struct BlobFailure {
    pub header: String,
    pub error: DecodeError,
}
