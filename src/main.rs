// On Windows, hide the console window for GUI applications
#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

use toolbench::init_logging;

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("Toolbench {} (built {})", toolbench::VERSION, toolbench::BUILD_DATE);

    toolbench_ui::gtk_app::main();

    Ok(())
}
