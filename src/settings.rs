//! Runtime settings
//!
//! Loaded from a JSON file next to the binary (or `--config <path>`).
//! Command line flags override whatever the file says.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TICKS_PER_SECOND;

/// Default settings file name, looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "flappy-gym.json";

/// Default location of the automated driver's policy artifact
pub const DEFAULT_POLICY_PATH: &str = "models/flappy_policy.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("ticks_per_second must be at least 1")]
    ZeroTickRate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation seed; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Pacing of the interactive drivers
    pub ticks_per_second: u32,
    /// Cap on steps per headless episode
    pub max_steps: Option<u64>,
    /// Artifact loaded by the automated driver
    pub policy_path: PathBuf,
    /// Draw headless runs to the terminal
    pub render: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            ticks_per_second: TICKS_PER_SECOND,
            max_steps: None,
            policy_path: PathBuf::from(DEFAULT_POLICY_PATH),
            render: false,
        }
    }
}

impl Settings {
    /// Parse and validate a settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load a settings file, falling back to defaults when it doesn't exist.
    /// A file that exists but can't be parsed is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.ticks_per_second == 0 {
            return Err(SettingsError::ZeroTickRate);
        }
        Ok(())
    }

    /// Wall-clock time between ticks for the interactive drivers
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_second.max(1) as f64)
    }

    /// The configured seed, or a fresh one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "flappy-gym-settings-{}-{}.json",
            std::process::id(),
            name
        ))
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.seed, None);
        assert_eq!(s.ticks_per_second, 30);
        assert_eq!(s.max_steps, None);
        assert_eq!(s.policy_path, PathBuf::from("models/flappy_policy.json"));
        assert!(!s.render);
        assert_eq!(s.tick_duration(), Duration::from_secs_f64(1.0 / 30.0));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{"seed": 42, "max_steps": 500}"#).unwrap();
        let s = Settings::load(&path).unwrap();
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.max_steps, Some(500));
        assert_eq!(s.ticks_per_second, TICKS_PER_SECOND);
        assert_eq!(s.resolve_seed(), 42);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = temp_path("missing");
        let s = Settings::load_or_default(&path).unwrap();
        assert_eq!(s, Settings::default());
        assert!(matches!(Settings::load(&path), Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_bad_files_rejected() {
        let path = temp_path("garbage");
        fs::write(&path, "seed = 3").unwrap();
        assert!(matches!(
            Settings::load_or_default(&path),
            Err(SettingsError::Parse { .. })
        ));

        fs::write(&path, r#"{"ticks_per_second": 0}"#).unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::ZeroTickRate)
        ));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_path("saved");
        let s = Settings {
            seed: Some(9),
            render: true,
            ..Settings::default()
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
        fs::remove_file(path).ok();
    }
}
