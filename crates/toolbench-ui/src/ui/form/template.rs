//! Declarative layout of the tool editor form
//!
//! The built-in template is used unless a JSON file overrides it. The
//! template picks titles, labels and which text fields appear in which
//! order; the editor decides what each field id binds to.

use gettextrs::gettext;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One labelled single-line field of the tool tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTemplate {
    /// Identifier the editor binds by (`coating`, `hardness`, ...)
    pub id: String,
    /// Visible label; empty means [`FieldTemplate::fallback_label`]
    #[serde(default)]
    pub label: String,
}

impl FieldTemplate {
    /// Label to show for this field
    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            Self::fallback_label(&self.id)
        } else {
            self.label.clone()
        }
    }

    /// Label for a field the template does not list: `supplier` -> `Supplier`
    pub fn fallback_label(id: &str) -> String {
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Titles, labels and field order of the tool editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormTemplate {
    /// Window title when the tool has no label
    pub window_title: String,
    /// Label of the always-present first tab
    pub tool_tab_label: String,
    pub feeds_tab_label: String,
    pub attributes_tab_label: String,
    /// Placeholder of the name field
    pub name_placeholder: String,
    /// Text fields below the shape and properties editors, in display
    /// order; a field left out is not shown
    pub fields: Vec<FieldTemplate>,
    pub notes_label: String,
    /// Dismiss button label
    pub close_label: String,
}

impl Default for FormTemplate {
    fn default() -> Self {
        let field = |id: &str, label: &str| FieldTemplate {
            id: id.to_string(),
            label: gettext(label),
        };
        Self {
            window_title: gettext("Tool Editor"),
            tool_tab_label: gettext("Tool"),
            feeds_tab_label: gettext("Feeds & Speeds"),
            attributes_tab_label: gettext("Attributes"),
            name_placeholder: gettext("Tool name"),
            fields: vec![
                field("coating", "Coating"),
                field("hardness", "Hardness"),
                field("materials", "Materials"),
                field("supplier", "Supplier"),
            ],
            notes_label: gettext("Notes"),
            close_label: gettext("Close"),
        }
    }
}

impl FormTemplate {
    /// Parse a template; missing keys take their built-in values
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a template file
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("invalid form template {}: {}", path.display(), e))
    }

    /// Load `path` if it exists, otherwise the built-in template
    ///
    /// A broken file is reported and replaced by the built-in template.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(template) => {
                tracing::debug!("Loaded form template from {}", path.display());
                template
            }
            Err(e) => {
                tracing::warn!("{}; using the built-in form", e);
                Self::default()
            }
        }
    }
}
