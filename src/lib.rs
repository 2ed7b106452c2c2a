//! # Toolbench
//!
//! A CNC tool library editor. Tools are stored in the FreeCAD tool
//! library layout (`Bit/*.fctb`, `Library/*.fctl`) and edited one at a
//! time in a modal tool editor.
//!
//! ## Architecture
//!
//! Toolbench is organized as a workspace with multiple crates:
//!
//! 1. **toolbench-core** - Tool and shape model, tool database, serializers, feeds and speeds
//! 2. **toolbench-settings** - Configuration file handling
//! 3. **toolbench-ui** - Tool editor model and its GTK4 views
//! 4. **toolbench** - Main binary that integrates all crates

pub use toolbench_core::data;
pub use toolbench_core::serializer;
pub use toolbench_ui::ui;

pub use toolbench_core::{
    Error, FcSerializer, FeedsCalculator, FeedsResult, Result, Shared, Tool, ToolDb, ToolId,
    ToolLibrary, ToolSerializer, ToolShape,
};

pub use toolbench_settings::{Config, SettingsManager};

pub use toolbench_ui::{DialogResponse, ToolEditor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    // In Windows GUI mode (release builds), log to a file instead of stdout
    #[cfg(all(target_os = "windows", not(debug_assertions)))]
    {
        use std::fs::OpenOptions;

        let log_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| std::path::PathBuf::from("."));

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("toolbench.log"))
        {
            Ok(file) => {
                let fmt_layer = fmt::layer()
                    .with_writer(file)
                    .with_target(true)
                    .with_level(true)
                    .with_line_number(true)
                    .pretty();

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .try_init()?;
            }
            Err(_) => {
                tracing_subscriber::registry().with(env_filter).try_init()?;
            }
        }
    }

    #[cfg(not(all(target_os = "windows", not(debug_assertions))))]
    {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
