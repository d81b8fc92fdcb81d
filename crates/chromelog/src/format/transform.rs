//! Row → console call transformation.
//!
//! Each row is mapped onto the payload columns, validated into a
//! [`NormalizedEntry`] and then turned into a [`ConsoleCall`] whose pattern
//! interleaves `%c` style tokens with the logged values.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::directive::{has_live_directive, unescape};
use super::method::ConsoleMethod;
use super::model::{ConsoleCall, NormalizedEntry};
use super::sanitize::sanitize;
use crate::conf::{OutputPosition, PipelineConfig, StyleCategory};
use crate::parser::{LogPayload, LogValue};

/// Own property producers set on serialized objects to carry their class name
pub const CLASS_NAME_MARKER: &str = "___class_name";

/// Pattern token for one styled value: style on, value, style off
const STYLED: &str = "%c%s%c";

pub struct Transformer<'a> {
    config: &'a PipelineConfig,
}

impl<'a> Transformer<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Transform every row of a payload, in row order. Truthy asserts are dropped.
    pub fn transform(&self, payload: &LogPayload, batch_time: DateTime<Utc>) -> Vec<ConsoleCall> {
        payload
            .rows
            .iter()
            .filter_map(|row| self.transform_row(&payload.columns, row, batch_time))
            .collect()
    }

    pub fn transform_row(
        &self,
        columns: &[String],
        row: &LogValue,
        batch_time: DateTime<Utc>,
    ) -> Option<ConsoleCall> {
        normalize(columns, row).map(|entry| self.format_entry(entry, batch_time))
    }

    /// Build the console call for a validated entry
    pub fn format_entry(&self, entry: NormalizedEntry, batch_time: DateTime<Utc>) -> ConsoleCall {
        let NormalizedEntry {
            method,
            mut args,
            backtrace,
            timestamp,
        } = entry;

        // Straight arguments for everything else, no annotations
        if !method.takes_pattern() || args.is_empty() {
            return ConsoleCall::new(method, String::new(), args);
        }

        let (mut pattern, mut args) = match args.first() {
            Some(Value::String(first)) if has_live_directive(first) => {
                let pattern = first.clone();
                args.remove(0);
                (pattern, args)
            }
            _ => self.synthesize(method, args),
        };

        let styles = self.config.styles();

        if let Some(fileline) = backtrace {
            annotate(
                &mut pattern,
                &mut args,
                self.config.backtrace_position,
                styles.raw(StyleCategory::Fileline),
                fileline,
            );
        }

        if self.config.timestamp_position != OutputPosition::None {
            let at = timestamp.unwrap_or(batch_time);
            let mut rendered = String::new();
            if write!(rendered, "{}", at.format(&self.config.timestamp_format)).is_ok() {
                annotate(
                    &mut pattern,
                    &mut args,
                    self.config.timestamp_position,
                    styles.raw(StyleCategory::Timestamp),
                    rendered,
                );
            } else {
                tracing::trace!(format = %self.config.timestamp_format, "timestamp format failed, annotation skipped");
            }
        }

        // A pattern without any live directive is plain text; log it as the
        // leading argument instead, escapes intact
        if !pattern.is_empty() && !has_live_directive(&pattern) {
            args.insert(0, Value::String(std::mem::take(&mut pattern)));
        }

        ConsoleCall::new(method, pattern, args)
    }

    /// Generate a pattern for arguments that do not bring their own
    fn synthesize(&self, method: ConsoleMethod, args: Vec<LogValue>) -> (String, Vec<LogValue>) {
        let styles = self.config.styles();
        let string_style = method.style_category().and_then(|c| styles.get(c));
        let number_style = styles.get(StyleCategory::Number);
        let classname_style = styles.get(StyleCategory::Classname);

        let mut fragments: Vec<String> = Vec::with_capacity(args.len());
        let mut out: Vec<LogValue> = Vec::with_capacity(args.len() * 3);

        for arg in args {
            match arg {
                Value::String(text) => match string_style {
                    Some(style) => {
                        fragments.push(STYLED.to_string());
                        push_styled(&mut out, style, Value::String(unescape(&text).into_owned()));
                    }
                    // Unstyled text becomes part of the pattern itself
                    None => fragments.push(text),
                },
                Value::Number(n) => match number_style {
                    Some(style) => {
                        fragments.push(STYLED.to_string());
                        push_styled(&mut out, style, Value::Number(n));
                    }
                    None => out.push(Value::Number(n)),
                },
                Value::Object(mut obj) => {
                    if let Some(style) = classname_style {
                        if let Some(class_name) = obj.remove(CLASS_NAME_MARKER) {
                            fragments.push(STYLED.to_string());
                            push_styled(&mut out, style, class_name);
                        }
                    }
                    fragments.push("%o".to_string());
                    out.push(Value::Object(obj));
                }
                other => {
                    fragments.push("%o".to_string());
                    out.push(other);
                }
            }
        }

        (fragments.join(" "), out)
    }
}

/// Map a row onto the columns and validate it.
///
/// Returns `None` for an assert whose condition holds; such rows log nothing.
pub fn normalize(columns: &[String], row: &LogValue) -> Option<NormalizedEntry> {
    let cells: &[Value] = match row {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    };

    let mut log = None;
    let mut backtrace = None;
    let mut kind = None;
    let mut timestamp = None;
    for (column, value) in columns.iter().zip(cells) {
        match column.as_str() {
            "log" => log = Some(value),
            "backtrace" => backtrace = Some(value),
            "type" => kind = Some(value),
            "timestamp" => timestamp = Some(value),
            _ => {}
        }
    }

    let mut method = match kind {
        None => ConsoleMethod::Log,
        Some(value) => value
            .as_str()
            .and_then(ConsoleMethod::from_name)
            .unwrap_or_else(|| {
                tracing::trace!(kind = %value, "unsupported console method, using log");
                ConsoleMethod::Log
            }),
    };

    let mut args: Vec<LogValue> = match log {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(sanitize).collect(),
        Some(scalar) => vec![sanitize(scalar)],
    };

    if method == ConsoleMethod::Assert {
        let holds = if args.is_empty() {
            false
        } else {
            is_truthy(&args.remove(0))
        };
        if holds {
            return None;
        }
        method = ConsoleMethod::Error;
    }

    let backtrace = backtrace.filter(|v| is_truthy(v)).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    Some(NormalizedEntry {
        method,
        args,
        backtrace,
        timestamp: timestamp.and_then(parse_timestamp),
    })
}

/// JavaScript truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn push_styled(out: &mut Vec<LogValue>, style: &str, value: LogValue) {
    out.push(Value::String(style.to_string()));
    out.push(value);
    out.push(Value::String(String::new()));
}

/// Place a styled annotation block before or after the pattern.
fn annotate(
    pattern: &mut String,
    args: &mut Vec<LogValue>,
    position: OutputPosition,
    style: &str,
    text: String,
) {
    let block = [
        Value::String(style.to_string()),
        Value::String(text),
        Value::String(String::new()),
    ];

    match position {
        OutputPosition::None => {}
        OutputPosition::Leading => {
            pattern.insert_str(0, STYLED);
            args.splice(0..0, block);
        }
        OutputPosition::Trailing => {
            if !pattern.is_empty() {
                pattern.push(' ');
            }
            pattern.push_str(STYLED);
            args.extend(block);
        }
    }
}

/// Producer timestamps: epoch seconds or milliseconds (number or string), or RFC 3339.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            if let Some(ts) = n.as_i64() {
                from_epoch(ts as f64)
            } else {
                n.as_f64().and_then(from_epoch)
            }
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| s.trim().parse::<f64>().ok().and_then(from_epoch)),
        _ => None,
    }
}

fn from_epoch(ts: f64) -> Option<DateTime<Utc>> {
    if !ts.is_finite() {
        return None;
    }
    let millis = if ts.abs() > 1_000_000_000_000.0 {
        // Milliseconds
        ts
    } else {
        // Seconds, possibly fractional
        ts * 1000.0
    };
    DateTime::from_timestamp_millis(millis.round() as i64)
}
