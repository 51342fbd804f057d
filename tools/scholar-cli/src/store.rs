//! JSON file store for calculator state
//!
//! The file holds the engine snapshot together with the settings that were
//! active when it was written. Writes go to a temporary file in the same
//! directory which is then renamed over the target.

use parking_lot::Mutex;
use scholar_calc::{CalcError, EngineSnapshot, PersistencePort, Result, Settings};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    engine: EngineSnapshot,
    #[serde(default)]
    settings: Option<Settings>,
}

pub struct JsonFileStore {
    path: PathBuf,
    settings: Mutex<Option<Settings>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Settings written alongside the next saved snapshot
    pub fn remember_settings(&self, settings: Settings) {
        *self.settings.lock() = Some(settings);
    }

    /// Settings stored with the last snapshot, if any
    pub fn load_settings(&self) -> Result<Option<Settings>> {
        Ok(self.read()?.and_then(|state| state.settings))
    }

    fn read(&self) -> Result<Option<StoredState>> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CalcError::persistence(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            },
        };
        Ok(Some(serde_json::from_slice(&data)?))
    }

    fn write(&self, state: &StoredState) -> Result<()> {
        let data = serde_json::to_vec_pretty(state)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| CalcError::persistence(e.to_string()))?;

        let mut file =
            NamedTempFile::new_in(dir).map_err(|e| CalcError::persistence(e.to_string()))?;
        file.write_all(&data)
            .map_err(|e| CalcError::persistence(e.to_string()))?;
        file.persist(&self.path)
            .map_err(|e| CalcError::persistence(e.to_string()))?;

        debug!(path = %self.path.display(), bytes = data.len(), "State saved");
        Ok(())
    }
}

impl PersistencePort for JsonFileStore {
    fn save(&self, snapshot: &EngineSnapshot) -> Result<()> {
        let settings = *self.settings.lock();
        self.write(&StoredState {
            engine: snapshot.clone(),
            settings,
        })
    }

    fn load(&self) -> Result<Option<EngineSnapshot>> {
        Ok(self.read()?.map(|state| state.engine))
    }
}
