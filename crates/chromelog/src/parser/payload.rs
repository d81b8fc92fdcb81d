use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde_json::Value;

use super::model::{DecodeError, LogPayload, LogValue};
use super::MAX_BLOB_SIZE;

/// Standard alphabet, padding optional, trailing bits ignored.
/// Matches what browsers accept for header payloads.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Configuration for the payload decoder
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Maximum encoded blob size to prevent DoS (default: 1MB)
    pub max_blob_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_blob_size: MAX_BLOB_SIZE,
        }
    }
}

/// Decodes one aggregated header blob into a [`LogPayload`].
#[derive(Debug, Clone, Default)]
pub struct PayloadDecoder {
    config: DecoderConfig,
}

impl PayloadDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn decode(&self, blob: &str) -> Result<LogPayload, DecodeError> {
        // Security: Enforce size limit before allocating anything
        if blob.len() > self.config.max_blob_size {
            return Err(DecodeError::TooLarge(blob.len(), self.config.max_blob_size));
        }

        let compact: Vec<u8> = blob
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        let bytes = FORGIVING.decode(&compact)?;

        // Full byte range: decode the bytes as UTF-8, not the base64 text
        let text = String::from_utf8(bytes)?;
        let value: Value = serde_json::from_str(&text)?;

        let mut obj = match value {
            Value::Object(obj) => obj,
            _ => return Err(DecodeError::NotAnObject),
        };

        let columns = coerce_columns(obj.get("columns"));
        // A malformed rows field yields an empty payload, not a decode error
        let rows = match obj.remove("rows") {
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                tracing::debug!(kind = value_kind(&other), "payload rows is not an array, ignoring");
                Vec::new()
            }
            None => Vec::new(),
        };

        Ok(LogPayload::new(columns, rows))
    }
}

/// Decode a blob with the default limits.
pub fn decode(blob: &str) -> Result<LogPayload, DecodeError> {
    PayloadDecoder::new().decode(blob)
}

fn coerce_columns(columns: Option<&LogValue>) -> Vec<String> {
    match columns {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.to_lowercase(),
                // Never matches a known column, keeps positions aligned
                _ => String::new(),
            })
            .collect(),
        _ => LogPayload::default_columns(),
    }
}

pub(crate) fn value_kind(value: &LogValue) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
    use serde_json::json;

    fn encode(value: &Value) -> String {
        STANDARD.encode(value.to_string())
    }

    #[test]
    fn test_decode_canonical_payload() {
        let blob = encode(&json!({
            "version": "4.1.0",
            "columns": ["log", "backtrace", "type"],
            "rows": [[["x"], false, "log"]]
        }));
        let payload = decode(&blob).unwrap();
        assert_eq!(payload.columns, vec!["log", "backtrace", "type"]);
        assert_eq!(payload.rows.len(), 1);
        assert_eq!(payload.rows[0], json!([["x"], false, "log"]));
    }

    #[test]
    fn test_decode_lowercases_columns() {
        let blob = encode(&json!({"columns": ["Type", "LOG"], "rows": []}));
        assert_eq!(decode(&blob).unwrap().columns, vec!["type", "log"]);
    }

    #[test]
    fn test_decode_defaults_missing_columns() {
        let blob = encode(&json!({"rows": [[["a"]]]}));
        let payload = decode(&blob).unwrap();
        assert_eq!(payload.columns, vec!["log", "backtrace", "type"]);
    }

    #[test]
    fn test_decode_defaults_non_array_columns() {
        let blob = encode(&json!({"columns": "log", "rows": []}));
        assert_eq!(decode(&blob).unwrap().columns, LogPayload::default_columns());
    }

    #[test]
    fn test_decode_non_string_column_keeps_position() {
        let blob = encode(&json!({"columns": [1, "TYPE"], "rows": []}));
        assert_eq!(decode(&blob).unwrap().columns, vec!["", "type"]);
    }

    #[test]
    fn test_decode_missing_rows_is_empty() {
        let blob = encode(&json!({"columns": ["log"]}));
        assert!(decode(&blob).unwrap().rows.is_empty());
    }

    #[test]
    fn test_decode_non_array_rows_is_empty() {
        let blob = encode(&json!({"columns": ["log"], "rows": {"0": [["x"]]}}));
        let payload = decode(&blob).unwrap();
        assert_eq!(payload.columns, vec!["log"]);
        assert!(payload.rows.is_empty());
    }

    #[test]
    fn test_decode_multibyte_utf8() {
        let blob = encode(&json!({"rows": [[["héllo — 日本"], false, "log"]]}));
        let payload = decode(&blob).unwrap();
        assert_eq!(payload.rows[0][0][0], json!("héllo — 日本"));
    }

    #[test]
    fn test_decode_without_padding_and_with_whitespace() {
        let text = json!({"rows": []}).to_string();
        let unpadded = STANDARD_NO_PAD.encode(&text);
        assert!(decode(&unpadded).is_ok());

        let padded = STANDARD.encode(&text);
        let spaced = format!("{} {}", &padded[..4], &padded[4..]);
        assert!(decode(&spaced).is_ok());
    }

    #[test]
    fn test_decode_invalid_base64() {
        let result = decode("!!!not base64!!!");
        assert!(matches!(result, Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_non_utf8() {
        let blob = STANDARD.encode([0xFF, 0xFE, 0x00, 0x01]);
        assert!(matches!(decode(&blob), Err(DecodeError::NonUtf8(_))));
    }

    #[test]
    fn test_decode_invalid_json() {
        let blob = STANDARD.encode("{\"rows\": [");
        assert!(matches!(decode(&blob), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let blob = STANDARD.encode("[1, 2, 3]");
        assert!(matches!(decode(&blob), Err(DecodeError::NotAnObject)));
    }

    #[test]
    fn test_decode_size_limit() {
        let decoder = PayloadDecoder::with_config(DecoderConfig { max_blob_size: 8 });
        let blob = encode(&json!({"rows": []}));
        assert!(matches!(decoder.decode(&blob), Err(DecodeError::TooLarge(_, 8))));
    }
}
