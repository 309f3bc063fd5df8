//! Injectable logging capability.
//!
//! Nothing in the engine owns a global logger. Every component that
//! reports anomalies (the parser, the row-cap step, the analysis pass,
//! the retry helper) takes a `&dyn Logger` and the host decides where
//! entries go:
//!
//! - [`RingBufferLogger`] — bounded in-memory ring, for tests and for
//!   hosts that surface recent log entries in a UI panel.
//! - [`TracingLogger`] — forwards to the `tracing` macros at matching
//!   levels, for production.
//! - [`NullLogger`] — discards everything.
//!
//! # Example
//!
//! ```
//! use datasight::logger::{Logger, LogLevel, RingBufferLogger};
//! use serde_json::json;
//!
//! let log = RingBufferLogger::new(100);
//! log.warn("row dropped", Some(json!({ "row": 3 })));
//!
//! let entries = log.entries();
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].level, LogLevel::Warn);
//! ```

use serde_json::Value as Context;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use std::time::SystemTime;

// ── Levels and entries ────────────────────────────────────────────────

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// One captured log entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Wall-clock time the entry was recorded.
    pub timestamp: SystemTime,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Optional structured context (JSON).
    pub context: Option<Context>,
}

// ── Logger capability ─────────────────────────────────────────────────

/// Logging capability passed into engine components.
///
/// Implementations must be callable through a shared reference; the
/// engine never requires `&mut` access to its logger.
pub trait Logger {
    /// Records one entry.
    fn log(&self, level: LogLevel, message: &str, context: Option<Context>);

    fn debug(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Debug, message, context);
    }

    fn info(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Info, message, context);
    }

    fn warn(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Warn, message, context);
    }

    fn error(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Error, message, context);
    }
}

// ── Ring buffer implementation ────────────────────────────────────────

/// Default capacity of the in-memory ring buffer.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Bounded in-memory logger.
///
/// Keeps the most recent `capacity` entries; older entries are evicted
/// from the front. Interior-mutable so it can be shared by reference
/// across components.
#[derive(Debug)]
pub struct RingBufferLogger {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

impl RingBufferLogger {
    /// Creates a logger holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Returns a snapshot of the retained entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Discards all retained entries.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl Default for RingBufferLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl Logger for RingBufferLogger {
    fn log(&self, level: LogLevel, message: &str, context: Option<Context>) {
        let entry = LogEntry {
            timestamp: SystemTime::now(),
            level,
            message: message.to_string(),
            context,
        };
        if let Ok(mut entries) = self.entries.lock() {
            if self.capacity == 0 {
                return;
            }
            if entries.len() == self.capacity {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }
}

// ── Tracing forwarder ─────────────────────────────────────────────────

/// Forwards entries to the `tracing` macros at matching levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, context: Option<Context>) {
        let ctx = context.map(|c| c.to_string());
        let ctx = ctx.as_deref().unwrap_or("");
        match level {
            LogLevel::Debug => tracing::debug!(context = ctx, "{message}"),
            LogLevel::Info => tracing::info!(context = ctx, "{message}"),
            LogLevel::Warn => tracing::warn!(context = ctx, "{message}"),
            LogLevel::Error => tracing::error!(context = ctx, "{message}"),
        }
    }
}

// ── Null logger ───────────────────────────────────────────────────────

/// Discards every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: LogLevel, _message: &str, _context: Option<Context>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_entries_in_order() {
        let log = RingBufferLogger::new(10);
        log.debug("first", None);
        log.info("second", Some(json!({ "rows": 5 })));
        log.error("third", None);

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].level, LogLevel::Info);
        assert_eq!(entries[1].context, Some(json!({ "rows": 5 })));
        assert_eq!(entries[2].level, LogLevel::Error);
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let log = RingBufferLogger::new(3);
        for i in 0..5 {
            log.info(&format!("entry {i}"), None);
        }

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "entry 2");
        assert_eq!(entries[2].message, "entry 4");
    }

    #[test]
    fn clear_empties_buffer() {
        let log = RingBufferLogger::default();
        log.warn("something", None);
        assert_eq!(log.entries().len(), 1);
        log.clear();
        assert!(log.entries().is_empty());
    }

    #[test]
    fn zero_capacity_discards() {
        let log = RingBufferLogger::new(0);
        log.info("dropped", None);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn null_logger_is_silent() {
        NullLogger.error("ignored", None);
    }

    #[test]
    fn tracing_logger_accepts_all_levels() {
        // No subscriber installed: events are dropped, nothing panics.
        let log = TracingLogger;
        log.debug("d", None);
        log.info("i", Some(json!({ "k": 1 })));
        log.warn("w", None);
        log.error("e", None);
    }
}
