//! Human-readable log format.
//!
//! An event with at most one field is written on a single line:
//!
//! ```text
//! [a] succeeded name: a
//! ```
//!
//! Events with more fields get a block of `key: value` lines framed by
//! separators, colored by level.

use crate::logging::{LogEvent, LogSink, LogTheme};
use std::io::{self, Write};

/// Separator line framing field blocks.
pub const SEPARATOR: &str =
    "======================================================================================";

/// Writes events as plain text.
pub struct SimpleSink<W: Write> {
    writer: W,
    theme: LogTheme,
}

impl<W: Write> SimpleSink<W> {
    /// Write to `writer` without colors.
    pub fn new(writer: W) -> Self {
        Self::with_theme(writer, LogTheme::plain())
    }

    /// Write to `writer` with the given theme.
    pub fn with_theme(writer: W, theme: LogTheme) -> Self {
        Self { writer, theme }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Render an event without writing it.
    pub fn format(&self, event: &LogEvent) -> String {
        let lines: Vec<String> = event
            .fields
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value.to_string().trim_matches('\n')))
            .collect();

        if lines.len() > 1 {
            let mut block = Vec::with_capacity(lines.len() + 2);
            block.push(SEPARATOR.to_string());
            block.extend(lines);
            block.push(SEPARATOR.to_string());
            format!(
                "{}\n{}",
                event.message,
                self.theme.paint(event.level, &block.join("\n"))
            )
        } else {
            std::iter::once(event.message.clone())
                .chain(lines)
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    fn write_event(&mut self, event: &LogEvent) -> io::Result<()> {
        let text = self.format(event);
        writeln!(self.writer, "{}", text)?;
        self.writer.flush()
    }
}

impl<W: Write> LogSink for SimpleSink<W> {
    fn emit(&mut self, event: &LogEvent) {
        if let Err(e) = self.write_event(event) {
            tracing::warn!("Failed to write {} log event: {}", event.level, e);
        }
    }
}
