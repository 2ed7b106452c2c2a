//! Settings file location and loading
//!
//! The configuration lives in `<config dir>/toolbench/config.json`.

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "toolbench";
const CONFIG_FILE: &str = "config.json";

/// Locates, loads and saves the application configuration
pub struct SettingsManager {
    path: PathBuf,
    config: Config,
}

impl SettingsManager {
    /// Platform configuration directory for Toolbench
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Default configuration file path
    pub fn config_file_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Open the configuration at `path`, falling back to defaults
    ///
    /// A missing file yields defaults silently; an unreadable or invalid
    /// one yields defaults and a warning, and is left untouched on disk.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = if path.exists() {
            Config::load_from_file(&path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load settings from {}: {}", path.display(), e);
                Config::default()
            })
        } else {
            Config::default()
        };
        Self { path, config }
    }

    /// Open the configuration at the default location
    pub fn open_default() -> SettingsResult<Self> {
        Ok(Self::open(Self::config_file_path()?))
    }

    /// Path of the configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable configuration; call [`SettingsManager::save`] to persist
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Write the configuration back to its file, creating its directory
    pub fn save(&self) -> SettingsResult<()> {
        self.config.save_to_file(&self.path)?;
        tracing::info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
