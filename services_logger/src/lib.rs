//! # Logger Service
//!
//! This crate implements structured logging for the file-system engine.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! The engine never writes to a console: it records [`LogEntry`] values into
//! an [`EventLog`] owned by the engine, and whoever drives the engine decides
//! whether and how to render them.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Source operation (if known)
    pub source: Option<String>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            source: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the source operation
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a field value by key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Bounded in-memory log
///
/// Entries below `min_level` are dropped on arrival. Once `capacity` entries
/// are held, each new entry evicts the oldest one.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    min_level: LogLevel,
    dropped: u64,
}

impl EventLog {
    /// Creates an empty log
    pub fn new(capacity: usize, min_level: LogLevel) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            min_level,
            dropped: 0,
        }
    }

    /// Records an entry, honoring the level filter and capacity
    pub fn record(&mut self, entry: LogEntry) {
        if entry.level < self.min_level || self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(entry);
    }

    /// Iterates over retained entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Returns the most recent entry
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Removes and returns all retained entries
    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.entries.drain(..).collect()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are retained
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries evicted because the log was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(LogLevel::Info, "test message");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "test message");
        assert!(entry.source.is_none());
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_log_entry_with_source() {
        let entry = LogEntry::new(LogLevel::Info, "test").with_source("create");
        assert_eq!(entry.source.as_deref(), Some("create"));
    }

    #[test]
    fn test_log_entry_with_fields() {
        let entry = LogEntry::new(LogLevel::Info, "test")
            .with_field("path", "/a/b")
            .with_field("id", 3);

        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.field("path"), Some("/a/b"));
        assert_eq!(entry.field("id"), Some("3"));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn test_event_log_filters_by_level() {
        let mut log = EventLog::new(8, LogLevel::Info);
        log.record(LogEntry::new(LogLevel::Debug, "quiet"));
        log.record(LogEntry::new(LogLevel::Warn, "loud"));

        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().message, "loud");
    }

    #[test]
    fn test_event_log_evicts_oldest() {
        let mut log = EventLog::new(2, LogLevel::Debug);
        log.record(LogEntry::new(LogLevel::Debug, "one"));
        log.record(LogEntry::new(LogLevel::Debug, "two"));
        log.record(LogEntry::new(LogLevel::Debug, "three"));

        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three"]);
        assert_eq!(log.dropped(), 1);
    }

    #[test]
    fn test_event_log_drain() {
        let mut log = EventLog::new(4, LogLevel::Debug);
        log.record(LogEntry::new(LogLevel::Error, "boom"));

        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_zero_capacity_log_records_nothing() {
        let mut log = EventLog::new(0, LogLevel::Debug);
        log.record(LogEntry::new(LogLevel::Error, "boom"));
        assert!(log.is_empty());
    }
}
