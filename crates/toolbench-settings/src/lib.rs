//! Toolbench Settings Crate
//!
//! Handles application configuration and its persistence.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{Config, LibrarySettings, MachineSettings, UiSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use manager::SettingsManager;
