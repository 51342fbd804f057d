//! Persistence port
//!
//! The engine never saves on its own. Callers save the [`EngineSnapshot`]
//! returned by `Calculator::export()` after handling events, and hand a
//! port to `Calculator::resume()` on start-up.

use parking_lot::Mutex;

use crate::error::Result;
use crate::snapshot::EngineSnapshot;

/// Storage backend for engine snapshots
///
/// Implementations can use a file, browser storage, or anything else.
pub trait PersistencePort: Send + Sync {
    /// Persist a snapshot, replacing any previous one
    fn save(&self, snapshot: &EngineSnapshot) -> Result<()>;

    /// Load the last saved snapshot, if any
    fn load(&self) -> Result<Option<EngineSnapshot>>;
}

/// In-memory store for testing and embedding
#[derive(Default)]
pub struct MemoryPersistence {
    data: Mutex<Option<Vec<u8>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored bytes directly
    pub fn put_raw(&self, data: impl Into<Vec<u8>>) {
        *self.data.lock() = Some(data.into());
    }
}

impl PersistencePort for MemoryPersistence {
    fn save(&self, snapshot: &EngineSnapshot) -> Result<()> {
        let data = snapshot.to_json()?;
        *self.data.lock() = Some(data);
        Ok(())
    }

    fn load(&self) -> Result<Option<EngineSnapshot>> {
        match self.data.lock().as_deref() {
            Some(data) => Ok(Some(EngineSnapshot::from_json(data)?)),
            None => Ok(None),
        }
    }
}

/// Null store - nothing is kept
pub struct NullPersistence;

impl PersistencePort for NullPersistence {
    fn save(&self, _snapshot: &EngineSnapshot) -> Result<()> {
        Ok(())
    }

    fn load(&self) -> Result<Option<EngineSnapshot>> {
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryPersistence::new();
        assert!(store.load().unwrap().is_none());

        let mut snapshot = EngineSnapshot::default();
        snapshot.session.display_value = "42".to_string();
        store.save(&snapshot).unwrap();

        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_corrupt_data_is_an_error() {
        let store = MemoryPersistence::new();
        store.put_raw("{broken");
        assert!(store.load().is_err());
    }

    #[test]
    fn test_null_store_keeps_nothing() {
        let store = NullPersistence;
        store.save(&EngineSnapshot::default()).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
