//! Step log output.
//!
//! The run log is a stream of [`LogEvent`]s written to a [`LogSink`]. The CLI
//! builds one sink for the whole process and lends it to the orchestrator.
//!
//! - [`SimpleSink`] - human-readable text with colored field blocks
//! - [`JsonSink`] - one JSON object per line
//! - [`MemorySink`] - records events for tests
//!
//! Internal diagnostics go through `tracing` instead and never reach a sink.

pub mod json;
pub mod memory;
pub mod simple;
pub mod theme;

use crate::steps::{FieldValue, Fields};
use std::io::Write;

pub use json::JsonSink;
pub use memory::MemorySink;
pub use simple::SimpleSink;
pub use theme::{should_use_colors, LogTheme};

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    /// Upper-case label, as written by the JSON sink.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured log record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// Severity.
    pub level: Level,

    /// Human-readable message.
    pub message: String,

    /// Attached fields, in output order.
    pub fields: Fields,
}

impl LogEvent {
    /// Create an event without fields.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Create an info event.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    /// Create a warning event.
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Level::Warn, message)
    }

    /// Create an error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    /// Append one field.
    pub fn with_field(mut self, key: &'static str, value: FieldValue) -> Self {
        self.fields.push((key, value));
        self
    }

    /// Append several fields.
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Look up a field by key.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Destination for step log events.
pub trait LogSink {
    /// Write one event.
    ///
    /// Write failures are reported through `tracing` and otherwise ignored,
    /// so a closed stdout never aborts a run.
    fn emit(&mut self, event: &LogEvent);
}

/// Step log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Message lines with colored field blocks.
    #[default]
    Simple,
    /// One JSON object per line.
    Json,
}

/// Create a sink of the given format writing to `writer`.
pub fn create_sink(format: OutputFormat, writer: Box<dyn Write>) -> Box<dyn LogSink> {
    match format {
        OutputFormat::Simple => {
            let theme = if should_use_colors() {
                LogTheme::new()
            } else {
                LogTheme::plain()
            };
            Box::new(SimpleSink::with_theme(writer, theme))
        }
        OutputFormat::Json => Box::new(JsonSink::new(writer)),
    }
}
