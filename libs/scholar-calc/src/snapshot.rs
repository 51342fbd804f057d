//! Output and persistence snapshots
//!
//! [`Snapshot`] is what the caller renders after every event.
//! [`EngineSnapshot`] is the complete engine state handed to a
//! [`PersistencePort`](crate::persistence::PersistencePort) and used to resume.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, Result};
use crate::history::{HistoryEntry, HistoryLog};
use crate::memory::MemoryBank;
use crate::session::Session;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// View returned after every input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub display_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_operator_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_operand_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub memory_indicator_active: bool,
    /// Formatted register, present while the indicator is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_text: Option<String>,
    /// Most recent first
    pub history: Vec<HistoryEntry>,
}

impl Snapshot {
    pub fn is_error(&self) -> bool {
        self.error_kind.is_some()
    }
}

/// Complete engine state for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub memory: MemoryBank,
    #[serde(default)]
    pub history: HistoryLog,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            session: Session::default(),
            memory: MemoryBank::default(),
            history: HistoryLog::default(),
        }
    }
}

impl EngineSnapshot {
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}
