//! Configuration module for the matrix console.
//!
//! # Module Structure
//!
//! - `loader`: settings paths, JSON (de)serialization, path validation
//!
//! # Settings Management
//!
//! The `SettingsManager` loads and persists `AppSettings`:
//! - Global file at `~/.config/parity-matrix/settings.json`
//! - Missing or unreadable files fall back to defaults instead of failing
//! - `load_from`/`save_to` take explicit paths (used by tests and `--settings`)

pub mod loader;

use crate::error::ConfigError;
use crate::models::EntityId;
use std::path::Path;

/// Persisted application settings
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // Data
    /// Dataset file (.json or .toml); empty means the built-in demo data
    pub dataset_path: String,
    /// Competitor ids selected at start-up; empty means the default subset
    pub initial_selection: Vec<EntityId>,

    // Matrix behaviour
    /// Competitors shown when nothing is selected
    pub default_selection_len: usize,
    /// Competitor series visible by default in a drill-down chart
    pub legend_default_visible: usize,

    // Window
    pub window_width: f32,
    pub window_height: f32,

    // Debug Settings
    pub debug_logging: bool,
    /// Directory for log files, relative to the working directory unless absolute
    pub log_dir: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            dataset_path: String::new(),
            initial_selection: Vec::new(),
            default_selection_len: 5,
            legend_default_visible: 3,
            window_width: 1440.0,
            window_height: 900.0,
            debug_logging: false,
            log_dir: "logs".to_string(),
        }
    }
}

impl AppSettings {
    /// Reject settings the matrix cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_selection_len == 0 {
            return Err(ConfigError::ValidationFailed(
                "default_selection_len must be at least 1".to_string(),
            ));
        }
        if !(self.window_width > 0.0 && self.window_height > 0.0) {
            return Err(ConfigError::ValidationFailed(format!(
                "window size must be positive, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if !self.dataset_path.is_empty() {
            let ext = Path::new(&self.dataset_path)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            if ext != "json" && ext != "toml" {
                return Err(ConfigError::ValidationFailed(format!(
                    "dataset_path must point to a .json or .toml file, got '{}'",
                    self.dataset_path
                )));
            }
        }
        Ok(())
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug_logging {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

/// Settings persistence for `AppSettings`.
pub struct SettingsManager;

impl SettingsManager {
    /// Load settings from the global settings file, or return defaults if the
    /// file doesn't exist.
    ///
    /// ERROR HANDLING: If the file is unreadable or fails validation, logs a
    /// warning and returns defaults instead of failing start-up.
    pub fn load() -> Result<AppSettings, ConfigError> {
        let path = loader::get_global_settings_path()?;
        match Self::load_from(&path) {
            Ok(settings) => Ok(settings),
            Err(ConfigError::FileNotFound(_)) => {
                log::info!("[Config] no settings at {}, using defaults", path.display());
                Ok(AppSettings::default())
            }
            Err(e) => {
                log::warn!(
                    "[Config] failed to load {}, falling back to defaults: {}",
                    path.display(),
                    e
                );
                Ok(AppSettings::default())
            }
        }
    }

    /// Load and validate settings from an explicit path.
    pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
        let settings = loader::load_settings_from_file(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the global settings file.
    pub fn save(settings: &AppSettings) -> Result<(), ConfigError> {
        loader::ensure_settings_dir_exists()?;
        let path = loader::get_global_settings_path()?;
        Self::save_to(&path, settings)
    }

    pub fn save_to(path: &Path, settings: &AppSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        loader::save_settings_to_file(settings, path)
    }
}
