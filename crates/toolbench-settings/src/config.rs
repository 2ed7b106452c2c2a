//! Configuration for Toolbench
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - UI preferences (window size, language, units)
//! - Tool library location
//! - Machine limits used by feeds and speeds

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toolbench_core::data::SpindleLimits;
pub use toolbench_core::units::MeasurementSystem;

/// UI preference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Main window width
    pub window_width: u32,
    /// Main window height
    pub window_height: u32,
    /// Tool editor dialog width
    #[serde(default = "default_editor_width")]
    pub editor_width: u32,
    /// Tool editor dialog height
    #[serde(default = "default_editor_height")]
    pub editor_height: u32,
    /// UI language code (e.g., "en", "de"); empty follows the system
    #[serde(default)]
    pub language: String,
    /// Measurement system for shape parameters entered without a unit
    #[serde(default)]
    pub measurement_system: MeasurementSystem,
}

fn default_editor_width() -> u32 {
    640
}

fn default_editor_height() -> u32 {
    520
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            window_width: 1000,
            window_height: 700,
            editor_width: default_editor_width(),
            editor_height: default_editor_height(),
            language: String::new(),
            measurement_system: MeasurementSystem::Metric,
        }
    }
}

/// Tool library location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrarySettings {
    /// Root of the tool directory (contains `Bit/` and `Library/`)
    pub directory: PathBuf,
    /// Library new tools are assigned to
    #[serde(default = "default_library_name")]
    pub default_library: String,
}

fn default_library_name() -> String {
    "Default".to_string()
}

impl Default for LibrarySettings {
    fn default() -> Self {
        let directory = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("toolbench")
            .join("Tools");
        Self {
            directory,
            default_library: default_library_name(),
        }
    }
}

/// Machine preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSettings {
    /// Lowest usable spindle speed
    pub min_spindle_rpm: f64,
    /// Highest usable spindle speed
    pub max_spindle_rpm: f64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        let limits = SpindleLimits::default();
        Self {
            min_spindle_rpm: limits.min_rpm,
            max_spindle_rpm: limits.max_rpm,
        }
    }
}

impl MachineSettings {
    /// Spindle limits for feeds and speeds
    pub fn spindle_limits(&self) -> SpindleLimits {
        SpindleLimits {
            min_rpm: self.min_spindle_rpm,
            max_rpm: self.max_spindle_rpm,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// UI settings
    #[serde(default)]
    pub ui: UiSettings,
    /// Tool library settings
    #[serde(default)]
    pub library: LibrarySettings,
    /// Machine settings
    #[serde(default)]
    pub machine: MachineSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> SettingsResult<()> {
        let out_of_range = |key: &str, value: String| -> SettingsError {
            ConfigError::ValueOutOfRange {
                key: key.to_string(),
                value,
            }
            .into()
        };

        if self.ui.window_width == 0 || self.ui.window_height == 0 {
            return Err(out_of_range(
                "ui.window_size",
                format!("{}x{}", self.ui.window_width, self.ui.window_height),
            ));
        }
        if self.ui.editor_width == 0 || self.ui.editor_height == 0 {
            return Err(out_of_range(
                "ui.editor_size",
                format!("{}x{}", self.ui.editor_width, self.ui.editor_height),
            ));
        }
        if !self.machine.min_spindle_rpm.is_finite() || self.machine.min_spindle_rpm < 0.0 {
            return Err(out_of_range(
                "machine.min_spindle_rpm",
                self.machine.min_spindle_rpm.to_string(),
            ));
        }
        if !self.machine.max_spindle_rpm.is_finite()
            || self.machine.max_spindle_rpm <= 0.0
            || self.machine.max_spindle_rpm < self.machine.min_spindle_rpm
        {
            return Err(out_of_range(
                "machine.max_spindle_rpm",
                self.machine.max_spindle_rpm.to_string(),
            ));
        }
        Ok(())
    }
}
