//! Saved calculation results: bounded history and favorites.
//!
//! A [`ResultLog`] keeps results newest-first with monotonic entry ids.
//! History uses a capacity (oldest entries fall off); favorites use none.
//! Logs serialize to JSON for backup and restore; where the backup lands
//! (a file, browser storage) is the caller's concern.

use crate::result::CalculationResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Default history capacity, matching the reference frontend.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// One saved result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic id, unique within this log.
    pub id: u64,
    /// When the entry was saved (RFC 3339). Distinct from the result's own
    /// computation timestamp.
    pub saved_at: String,
    pub result: CalculationResult,
}

/// A newest-first list of saved results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultLog {
    entries: Vec<LogEntry>,
    capacity: Option<usize>,
    next_id: u64,
}

impl ResultLog {
    /// A bounded history log (capacity 100).
    pub fn history() -> Self {
        Self::with_capacity(Some(DEFAULT_HISTORY_CAPACITY))
    }

    /// An unbounded log (favorites).
    pub fn favorites() -> Self {
        Self::with_capacity(None)
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            next_id: 0,
        }
    }

    /// Save a result at the front. Returns the new entry's id. When over
    /// capacity, the oldest entries are dropped.
    pub fn push(&mut self, result: CalculationResult) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            0,
            LogEntry {
                id,
                saved_at: Utc::now().to_rfc3339(),
                result,
            },
        );
        if let Some(capacity) = self.capacity
            && self.entries.len() > capacity
        {
            self.entries.truncate(capacity);
        }
        id
    }

    /// Entries newest-first, optionally filtered by tool and limited.
    pub fn recent(&self, tool_id: Option<&str>, limit: Option<usize>) -> Vec<&LogEntry> {
        let filtered = self
            .entries
            .iter()
            .filter(|e| tool_id.is_none_or(|t| e.result.tool_id == t));
        match limit {
            Some(n) => filtered.take(n).collect(),
            None => filtered.collect(),
        }
    }

    pub fn get(&self, id: u64) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Remove one entry. Returns whether it existed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Clear entries for one tool, or everything when `None`.
    pub fn clear(&mut self, tool_id: Option<&str>) {
        match tool_id {
            Some(t) => self.entries.retain(|e| e.result.tool_id != t),
            None => self.entries.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize for backup.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("log entries are always serializable")
    }

    /// Restore from a backup produced by [`ResultLog::to_json`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
