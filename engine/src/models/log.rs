//! Narration log
//!
//! `LogFeed` is the append-only, creation-ordered feed of human-readable
//! `LogEntry` records consumed by the display layer. Entries are never
//! mutated, reordered or removed after creation; the feed only appends.

use serde::{Deserialize, Serialize};

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single immutable narration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique entry identifier (UUID)
    id: String,

    /// Creation timestamp (milliseconds)
    timestamp: u64,

    /// Severity level
    level: LogLevel,

    /// Human-readable message
    message: String,

    /// Display name of the originating agent or subsystem, if any
    agent_name: Option<String>,
}

impl LogEntry {
    /// Get entry ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get creation timestamp (milliseconds)
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Get severity level
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Get message text
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get attribution, if any
    pub fn agent_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }
}

/// Append-only, creation-ordered log feed
///
/// # Example
/// ```
/// use agent_treasury_core_rs::{LogFeed, LogLevel};
///
/// let mut feed = LogFeed::new();
/// feed.append(1_000, LogLevel::Info, "Wallet connected".to_string(), None);
/// assert_eq!(feed.len(), 1);
/// assert_eq!(feed.entries()[0].message(), "Wallet connected");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogFeed {
    entries: Vec<LogEntry>,
}

impl LogFeed {
    /// Create an empty feed
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return a reference to it
    ///
    /// Entries are stored in append order, which is creation order; there
    /// is no API to mutate or remove existing entries.
    pub fn append(
        &mut self,
        timestamp: u64,
        level: LogLevel,
        message: String,
        agent_name: Option<String>,
    ) -> &LogEntry {
        self.entries.push(LogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            level,
            message,
            agent_name,
        });
        self.entries
            .last()
            .expect("entry was just pushed")
    }

    /// Get all entries in creation order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the feed is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries (session reset only; not part of the append-only
    /// contract seen by the display layer)
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
