//! Bounded calculation history, most recent first

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Maximum number of retained entries
pub const HISTORY_CAPACITY: usize = 20;

/// One completed calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    /// e.g. `"2 + 3"`
    pub expression: String,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            expression: expression.into(),
            result: result.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history log
///
/// Insertion prepends; once more than [`HISTORY_CAPACITY`] entries are held
/// the oldest one is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Drop entries past the capacity, keeping the most recent ones
    pub(crate) fn enforce_capacity(&mut self) -> usize {
        let excess = self.entries.len().saturating_sub(HISTORY_CAPACITY);
        self.entries.truncate(HISTORY_CAPACITY);
        excess
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_first() {
        let mut log = HistoryLog::new();
        log.append(HistoryEntry::new("1 + 1", "2"));
        log.append(HistoryEntry::new("2 × 3", "6"));

        let expressions: Vec<_> = log.iter().map(|e| e.expression.as_str()).collect();
        assert_eq!(expressions, ["2 × 3", "1 + 1"]);
        assert_eq!(log.iter().next().unwrap().result, "6");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = HistoryLog::new();
        for i in 0..=HISTORY_CAPACITY {
            log.append(HistoryEntry::new(format!("{} + 0", i), i.to_string()));
        }

        assert_eq!(log.len(), HISTORY_CAPACITY);
        assert_eq!(log.iter().next().unwrap().result, "20");
        // entry 0 was the oldest and is gone
        assert!(log.iter().all(|e| e.result != "0"));
        assert_eq!(log.iter().last().unwrap().result, "1");
    }

    #[test]
    fn test_clear() {
        let mut log = HistoryLog::new();
        log.append(HistoryEntry::new("1 + 1", "2"));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_serializes_as_list() {
        let mut log = HistoryLog::new();
        log.append(HistoryEntry::new("1 + 1", "2"));
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        let back: HistoryLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }
}
