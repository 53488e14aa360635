//! JSON Lines log format.
//!
//! Each event becomes one object: `time`, `level` and `msg` first, then the
//! event's fields in order.

use crate::logging::{LogEvent, LogSink};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::io::{self, Write};

/// Writes events as JSON objects, one per line.
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    /// Create a JSON sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_event(&mut self, event: &LogEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, &event_to_json(event))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

/// Build the JSON object for an event.
pub fn event_to_json(event: &LogEvent) -> Value {
    let mut object = Map::new();
    object.insert(
        "time".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
    );
    object.insert(
        "level".to_string(),
        Value::String(event.level.as_str().to_string()),
    );
    object.insert("msg".to_string(), Value::String(event.message.clone()));
    for (key, value) in &event.fields {
        object.insert((*key).to_string(), value.to_json());
    }
    Value::Object(object)
}

impl<W: Write> LogSink for JsonSink<W> {
    fn emit(&mut self, event: &LogEvent) {
        if let Err(e) = self.write_event(event) {
            tracing::warn!("Failed to write {} log event: {}", event.level, e);
        }
    }
}
