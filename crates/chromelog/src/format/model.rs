use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::method::ConsoleMethod;
use crate::parser::LogValue;

/// A row after column mapping and validation, before pattern generation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEntry {
    pub method: ConsoleMethod,
    pub args: Vec<LogValue>,
    /// `file:line` of the producing call, if the row carried one
    pub backtrace: Option<String>,
    /// Producer-supplied time for this row
    pub timestamp: Option<DateTime<Utc>>,
}

/// One console invocation handed to a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleCall {
    pub method: ConsoleMethod,
    /// Substitution pattern; empty means the args are logged as-is
    pub pattern: String,
    pub args: Vec<LogValue>,
}

impl ConsoleCall {
    pub fn new(method: ConsoleMethod, pattern: impl Into<String>, args: Vec<LogValue>) -> Self {
        Self {
            method,
            pattern: pattern.into(),
            args,
        }
    }

    /// Flattened argument form: `[method, pattern?, ...args]`
    pub fn invocation(&self) -> Vec<LogValue> {
        let mut out = Vec::with_capacity(self.args.len() + 2);
        out.push(Value::String(self.method.as_str().to_string()));
        if !self.pattern.is_empty() {
            out.push(Value::String(self.pattern.clone()));
        }
        out.extend(self.args.iter().cloned());
        out
    }
}
