//! In-memory sink for testing.
//!
//! ```
//! use sheryl::logging::{LogEvent, LogSink, MemorySink};
//!
//! let mut sink = MemorySink::new();
//! sink.emit(&LogEvent::info("[a] succeeded"));
//!
//! assert_eq!(sink.messages(), vec!["[a] succeeded"]);
//! ```

use crate::logging::{Level, LogEvent, LogSink};

/// Captures every emitted event for later assertion.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Vec<LogEvent>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events in order.
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Messages of all captured events.
    pub fn messages(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.message.as_str()).collect()
    }

    /// Captured events of one level.
    pub fn at_level(&self, level: Level) -> Vec<&LogEvent> {
        self.events.iter().filter(|e| e.level == level).collect()
    }

    /// First event whose message contains `needle`.
    pub fn find(&self, needle: &str) -> Option<&LogEvent> {
        self.events.iter().find(|e| e.message.contains(needle))
    }

    /// Last captured event.
    pub fn last(&self) -> Option<&LogEvent> {
        self.events.last()
    }
}

impl LogSink for MemorySink {
    fn emit(&mut self, event: &LogEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut sink = MemorySink::new();
        sink.emit(&LogEvent::info("first"));
        sink.emit(&LogEvent::error("second"));

        assert_eq!(sink.messages(), vec!["first", "second"]);
        assert_eq!(sink.at_level(Level::Error).len(), 1);
        assert_eq!(sink.last().unwrap().message, "second");
        assert!(sink.find("sec").is_some());
        assert!(sink.find("third").is_none());
    }
}
