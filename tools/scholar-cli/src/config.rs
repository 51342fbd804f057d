//! CLI configuration
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `scholar.toml` / `scholar.yaml` in the working directory, or the file
//!    given with `--config`
//! 3. `SCHOLAR_` prefixed environment variables (`__` separates nested keys,
//!    e.g. `SCHOLAR_SETTINGS__PRECISION=4`)
//!
//! Command-line flags are applied on top by `main`.

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use scholar_calc::Settings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "SCHOLAR_";

pub const DEFAULT_STATE_FILE: &str = "scholar-state.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Starting settings, used when the state file carries none
    pub settings: Settings,
    /// Where the calculator state is kept between runs
    pub state_file: PathBuf,
    /// Save after every batch of keys
    pub auto_save: bool,
    /// Filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            auto_save: true,
            log_level: "warn".to_string(),
        }
    }
}

/// Load configuration, optionally from an explicit file
pub fn load(path: Option<&Path>) -> Result<CliConfig> {
    let figment = Figment::from(Serialized::defaults(CliConfig::default()));

    let figment = match path {
        Some(path) => merge_file(figment, path)?,
        None => figment
            .merge(Toml::file("scholar.toml"))
            .merge(Yaml::file("scholar.yaml")),
    };

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("Failed to load configuration")
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    if !path.exists() {
        bail!("Config file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .context("Config file must have an extension")?;

    let figment = match extension {
        "toml" => figment.merge(Toml::file(path)),
        "yaml" | "yml" => figment.merge(Yaml::file(path)),
        "json" => figment.merge(Json::file(path)),
        other => bail!("Unsupported config file format: {}", other),
    };
    Ok(figment)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use figment::Jail;
    use scholar_calc::AngleUnit;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let config = load(None).unwrap();
            assert_eq!(config, CliConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "scholar.toml",
                r#"
                auto_save = false

                [settings]
                angle_unit = "rad"
                precision = 4
                "#,
            )?;
            jail.set_env("SCHOLAR_SETTINGS__PRECISION", "6");
            jail.set_env("SCHOLAR_LOG_LEVEL", "debug");

            let config = load(None).unwrap();
            assert!(!config.auto_save);
            assert_eq!(config.settings.angle_unit, AngleUnit::Radians);
            assert_eq!(config.settings.precision, 6);
            assert!(!config.settings.use_scientific_notation);
            assert_eq!(config.log_level, "debug");
            assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILE));
            Ok(())
        });
    }

    #[test]
    fn test_explicit_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "calc.yaml",
                "state_file: /tmp/calc.json\nsettings:\n  use_scientific_notation: true\n",
            )?;

            let config = load(Some(Path::new("calc.yaml"))).unwrap();
            assert_eq!(config.state_file, PathBuf::from("/tmp/calc.json"));
            assert!(config.settings.use_scientific_notation);
            assert_eq!(config.settings.precision, 10);
            Ok(())
        });
    }

    #[test]
    fn test_missing_or_unknown_file() {
        Jail::expect_with(|jail| {
            assert!(load(Some(Path::new("absent.toml"))).is_err());

            jail.create_file("calc.ini", "precision=3")?;
            assert!(load(Some(Path::new("calc.ini"))).is_err());
            Ok(())
        });
    }
}
