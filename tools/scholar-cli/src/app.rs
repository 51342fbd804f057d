//! Dispatcher state: the engine, the caller-owned settings and the store

use anyhow::Result;
use scholar_calc::{Calculator, PersistencePort, Settings, Snapshot};
use tracing::{info, warn};

use crate::store::JsonFileStore;
use crate::tokens::KeyParser;

pub struct App {
    pub calc: Calculator,
    pub settings: Settings,
    store: JsonFileStore,
    auto_save: bool,
    parser: KeyParser,
}

impl App {
    /// Resume from `store`
    ///
    /// Settings saved with the state replace `defaults`; a failed settings
    /// read keeps the defaults.
    pub fn open(store: JsonFileStore, defaults: Settings, auto_save: bool) -> Result<Self> {
        let settings = match store.load_settings() {
            Ok(Some(saved)) => saved,
            Ok(None) => defaults,
            Err(e) => {
                warn!("Ignoring saved settings: {}", e);
                defaults
            },
        };
        let calc = Calculator::resume(&store);
        info!(path = %store.path().display(), "State loaded");

        Ok(Self {
            calc,
            settings,
            store,
            auto_save,
            parser: KeyParser::new()?,
        })
    }

    /// Feed a line of keys to the engine
    pub fn keys(&mut self, line: &str) -> Result<Snapshot> {
        let events = self.parser.parse_line(line)?;
        let view = self.calc.handle_all(events, &self.settings);
        if self.auto_save {
            self.save();
        }
        Ok(view)
    }

    pub fn view(&self) -> Snapshot {
        self.calc.snapshot(&self.settings)
    }

    /// Write the state now; failures are logged, never returned
    pub fn save(&self) {
        self.store.remember_settings(self.settings);
        if let Err(e) = self.store.save(&self.calc.export()) {
            warn!(path = %self.store.path().display(), "Failed to save state: {}", e);
        }
    }

    /// Save after a change that did not go through [`App::keys`]
    pub fn changed(&self) {
        if self.auto_save {
            self.save();
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use scholar_calc::AngleUnit;
    use tempfile::TempDir;

    #[test]
    fn test_state_carries_over_runs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut app = App::open(JsonFileStore::new(&path), Settings::default(), true).unwrap();
        app.settings = app.settings.with_angle_unit(AngleUnit::Radians);
        let view = app.keys("12.5 × 2 =").unwrap();
        assert_eq!(view.display_text, "25");

        let app = App::open(JsonFileStore::new(&path), Settings::default(), true).unwrap();
        assert_eq!(app.settings.angle_unit, AngleUnit::Radians);
        assert_eq!(app.view().display_text, "25");
        assert_eq!(app.view().history[0].expression, "12.5 × 2");
    }

    #[test]
    fn test_without_auto_save_nothing_is_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut app = App::open(JsonFileStore::new(&path), Settings::default(), false).unwrap();
        app.keys("1 + 1 =").unwrap();
        assert!(!path.exists());

        app.save();
        assert!(path.exists());
    }

    #[test]
    fn test_bad_key_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut app = App::open(
            JsonFileStore::new(dir.path().join("state.json")),
            Settings::default(),
            false,
        )
        .unwrap();
        app.keys("4").unwrap();
        assert!(app.keys("+ 2 bogus").is_err());
        assert_eq!(app.view().display_text, "4");
        assert!(app.view().pending_operator_text.is_none());
    }
}
