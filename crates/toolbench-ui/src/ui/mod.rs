//! User interface module
//!
//! `form` and `tool_editor` hold the editor models and need no display;
//! `gtk` renders them.

pub mod form;
pub mod gtk;
pub mod tool_editor;
