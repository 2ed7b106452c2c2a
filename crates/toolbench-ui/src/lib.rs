//! # Toolbench UI
//!
//! Tool editor dialog and the GTK application around it.

pub mod gtk_app;
pub mod ui;

pub use toolbench_settings::{Config, SettingsManager};
pub use ui::form::{FormTemplate, Signal, TabBook, TextField};
pub use ui::tool_editor::{
    DialogResponse, DialogState, EditorOptions, FeedsAndSpeedsEditor, ModalHost, ShapeEditor,
    ToolAttributes, ToolEditor, ToolProperties,
};
