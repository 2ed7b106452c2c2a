//! Form primitives shared by the editors

pub mod fields;
pub mod signal;
pub mod tabs;
pub mod template;

pub use fields::{ChoiceField, Property, TextField};
pub use signal::{HandlerId, Signal};
pub use tabs::{Tab, TabBook, TabPage};
pub use template::{FieldTemplate, FormTemplate};

/// Multi-line text input; built with [`TextField::multi_line`]
pub type TextArea = TextField;
