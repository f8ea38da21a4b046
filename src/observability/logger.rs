//! Structured JSON logger
//!
//! Pipeline stages report progress as one JSON object per line so runs can
//! be diffed. Events are rendered through serde_json, the same machinery
//! every document in this tool flows through, which also settles string
//! escaping. The `event` and `severity` keys lead each line and the
//! remaining fields follow in sorted order, keeping output deterministic.

use std::fmt;
use std::io::{self, Write};

use serde_json::{Map, Value};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Normal operations
    Info,
    /// Recoverable issues, e.g. a skipped workload entry
    Warn,
    /// Operation failures
    Error,
    /// Unrecoverable, process exits
    Fatal,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Failures go to stderr, everything else to stdout
    fn is_failure(&self) -> bool {
        matches!(self, Severity::Error | Severity::Fatal)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs one JSON event per line.
///
/// Writes are synchronous and unbuffered; each event is flushed before the
/// pipeline continues.
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields.
    ///
    /// Fields are output in deterministic order (alphabetical by key).
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::render(severity, event, fields);
        if severity.is_failure() {
            Self::write_line(&mut io::stderr(), &line);
        } else {
            Self::write_line(&mut io::stdout(), &line);
        }
    }

    /// Renders one event as a JSON line, trailing newline included
    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut document = Map::new();
        document.insert("event".to_string(), Value::String(event.to_string()));
        document.insert(
            "severity".to_string(),
            Value::String(severity.as_str().to_string()),
        );

        let mut sorted: Vec<(&str, &str)> = fields.to_vec();
        sorted.sort_by_key(|(key, _)| *key);
        for (key, value) in sorted {
            document.insert(key.to_string(), Value::String(value.to_string()));
        }

        let mut line = Value::Object(document).to_string();
        line.push('\n');
        line
    }

    fn write_line<W: Write>(writer: &mut W, line: &str) {
        // Single write so events from interleaved stages stay whole lines
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Log at FATAL level
    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Fatal, event, fields);
    }
}
