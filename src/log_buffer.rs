//! Bounded in-memory log trail shared with the presentation layer
//!
//! Every stage appends human-readable progress and failure messages here so
//! an embedding application can render them without wiring up a tracing
//! subscriber. The buffer is an explicit object owned by the pipeline and
//! handed to each stage as an `Arc`, not a module-level global; when full,
//! the oldest entry is evicted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tracing::{error, info, warn};

/// Number of entries retained before the oldest is evicted
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Severity of a log entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Normal progress message
    Info,
    /// Recoverable problem; the run continued
    Warning,
    /// A stage failed
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// One entry in the log trail
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the entry was appended
    pub timestamp: DateTime<Utc>,

    /// Severity
    pub level: LogLevel,

    /// Human-readable message
    pub message: String,
}

/// Append-only, capacity-bounded ring buffer of log entries
///
/// Appends are also mirrored to the matching `tracing` level so call sites
/// stay single. Reads return a snapshot; concurrent runs sharing one buffer
/// interleave their entries with no run identifier (known limitation).
#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl LogBuffer {
    /// Create a buffer with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Create a buffer retaining at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append one entry, evicting the oldest when the buffer is full
    pub fn append(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Info => info!("{message}"),
            LogLevel::Warning => warn!("{message}"),
            LogLevel::Error => error!("{message}"),
        }

        if self.capacity == 0 {
            return;
        }
        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(LogEntry {
            timestamp: Utc::now(),
            level,
            message,
        });
    }

    /// Snapshot of every retained entry, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Drop every retained entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no entries are retained
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<LogEntry>> {
        // A poisoned lock only means a writer panicked mid-append; the
        // entries themselves are still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_read_preserves_order() {
        let buffer = LogBuffer::new();
        buffer.append(LogLevel::Info, "first");
        buffer.append(LogLevel::Warning, "second");
        buffer.append(LogLevel::Error, "third");

        let entries = buffer.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[2].message, "third");
        assert_eq!(entries[2].level, LogLevel::Error);
    }

    #[test]
    fn oldest_entry_is_evicted_at_capacity() {
        let buffer = LogBuffer::with_capacity(3);
        for i in 0..5 {
            buffer.append(LogLevel::Info, format!("entry {i}"));
        }

        let entries = buffer.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "entry 2");
        assert_eq!(entries[2].message, "entry 4");
    }

    #[test]
    fn clear_empties_the_buffer() {
        let buffer = LogBuffer::new();
        buffer.append(LogLevel::Info, "something");
        assert!(!buffer.is_empty());

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.entries().is_empty());
    }

    #[test]
    fn zero_capacity_buffer_retains_nothing() {
        let buffer = LogBuffer::with_capacity(0);
        buffer.append(LogLevel::Info, "dropped");
        assert!(buffer.entries().is_empty());
    }
}
