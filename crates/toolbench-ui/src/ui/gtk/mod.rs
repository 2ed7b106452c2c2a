//! GTK4 views over the toolkit-independent editors

pub mod bind;
pub mod library_window;
pub mod tool_editor_dialog;

pub use library_window::LibraryWindow;
pub use tool_editor_dialog::ToolEditorDialog;
