//! Tool definitions
//!
//! A [`Tool`] is one tool library entry: a label, a shape with its
//! geometry, a few cutting properties and free-text supplier metadata.

use super::shape::{ShapeKind, ToolShape};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tool identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ToolId(
    /// The unique string identifier for the tool.
    pub String,
);

impl ToolId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tool material composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMaterial {
    /// High Speed Steel
    Hss,
    /// Carbide
    #[default]
    Carbide,
}

impl ToolMaterial {
    /// Get all tool materials
    pub fn all() -> &'static [ToolMaterial] {
        &[ToolMaterial::Hss, ToolMaterial::Carbide]
    }

    /// Parse a display name back into a material
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "hss" => Some(Self::Hss),
            "carbide" => Some(Self::Carbide),
            _ => None,
        }
    }
}

impl fmt::Display for ToolMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hss => write!(f, "HSS"),
            Self::Carbide => write!(f, "Carbide"),
        }
    }
}

/// Attribute names stored by dedicated tool fields
pub const RESERVED_ATTRS: &[&str] = &[
    "Flutes",
    "Chipload",
    "Material",
    "Coating",
    "Hardness",
    "Materials",
    "Supplier",
    "Notes",
];

/// Whether `name` belongs to a dedicated field rather than a custom attribute
pub fn is_reserved_attr(name: &str) -> bool {
    RESERVED_ATTRS.contains(&name)
}

/// Complete tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Unique tool identifier
    pub id: ToolId,
    label: String,
    /// Shape and geometry
    pub shape: ToolShape,
    /// Optional preview image path
    pub pixmap: Option<String>,

    /// Number of flutes
    pub flutes: Option<u32>,
    /// Chip load in mm per tooth
    pub chipload: Option<f64>,
    /// Tool material composition
    pub material: ToolMaterial,

    coating: String,
    hardness: String,
    materials: String,
    supplier: String,
    notes: String,

    attrs: BTreeMap<String, String>,
}

impl Tool {
    /// Create a new tool with a fresh id
    pub fn new(label: impl Into<String>, shape: ToolShape) -> Self {
        Self::with_id(ToolId::generate(), label, shape)
    }

    /// Create a tool with a known id, for deserialization
    pub fn with_id(id: ToolId, label: impl Into<String>, shape: ToolShape) -> Self {
        Self {
            id,
            label: label.into(),
            shape,
            pixmap: None,
            flutes: None,
            chipload: None,
            material: ToolMaterial::default(),
            coating: String::new(),
            hardness: String::new(),
            materials: String::new(),
            supplier: String::new(),
            notes: String::new(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    pub fn get_coating(&self) -> &str {
        &self.coating
    }

    pub fn set_coating(&mut self, coating: &str) {
        self.coating = coating.to_string();
    }

    pub fn get_hardness(&self) -> &str {
        &self.hardness
    }

    pub fn set_hardness(&mut self, hardness: &str) {
        self.hardness = hardness.to_string();
    }

    /// Work-piece materials the tool is meant for, free text
    pub fn get_materials(&self) -> &str {
        &self.materials
    }

    pub fn set_materials(&mut self, materials: &str) {
        self.materials = materials.to_string();
    }

    pub fn get_supplier(&self) -> &str {
        &self.supplier
    }

    pub fn set_supplier(&mut self, supplier: &str) {
        self.supplier = supplier.to_string();
    }

    pub fn get_notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
    }

    /// Cutting diameter in mm, if the shape has one
    pub fn get_diameter(&self) -> Option<f64> {
        self.shape.diameter()
    }

    /// Whether cutting speeds can be computed for this tool
    ///
    /// Requires a rotating cutter with a positive diameter.
    pub fn supports_feeds_and_speeds(&self) -> bool {
        self.shape.kind().is_cutter() && self.get_diameter().is_some_and(|d| d > 0.0)
    }

    /// Get a custom attribute
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Set a custom attribute, replacing any previous value
    ///
    /// Returns false and leaves the tool unchanged for a name in
    /// [`RESERVED_ATTRS`].
    pub fn set_attr(&mut self, name: &str, value: &str) -> bool {
        if is_reserved_attr(name) {
            tracing::warn!("Attribute name '{}' is reserved", name);
            return false;
        }
        self.attrs.insert(name.to_string(), value.to_string());
        true
    }

    /// Remove a custom attribute
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }

    /// All custom attributes, sorted by name
    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    /// Short summary for list rows
    pub fn description_short(&self) -> String {
        match self.get_diameter() {
            Some(d) => format!("{} ({}, Ø {:.3} mm)", self.label, self.shape.kind(), d),
            None => format!("{} ({})", self.label, self.shape.kind()),
        }
    }
}

impl Default for Tool {
    fn default() -> Self {
        Self::new(String::new(), ToolShape::builtin(ShapeKind::Endmill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::shape::ParamValue;

    #[test]
    fn test_text_accessors() {
        let mut tool = Tool::default();
        tool.set_label("6mm Endmill");
        tool.set_coating("TiAlN");
        tool.set_hardness("HRC55");
        tool.set_materials("Aluminium, plastics");
        tool.set_supplier("Acme");
        tool.set_notes("line one\nline two");

        assert_eq!(tool.get_label(), "6mm Endmill");
        assert_eq!(tool.get_coating(), "TiAlN");
        assert_eq!(tool.get_hardness(), "HRC55");
        assert_eq!(tool.get_materials(), "Aluminium, plastics");
        assert_eq!(tool.get_supplier(), "Acme");
        assert_eq!(tool.get_notes(), "line one\nline two");
    }

    #[test]
    fn test_supports_feeds_and_speeds() {
        let tool = Tool::new("Endmill", ToolShape::builtin(ShapeKind::Endmill));
        assert!(tool.supports_feeds_and_speeds());

        let probe = Tool::new("Probe", ToolShape::builtin(ShapeKind::Probe));
        assert!(!probe.supports_feeds_and_speeds());

        let mut flat = Tool::new("Zero", ToolShape::builtin(ShapeKind::Drill));
        flat.shape
            .set_param("Diameter", ParamValue::Length(0.0))
            .unwrap();
        assert!(!flat.supports_feeds_and_speeds());
    }

    #[test]
    fn test_attributes() {
        let mut tool = Tool::default();
        tool.set_attr("Pocket", "12");
        assert_eq!(tool.get_attr("Pocket"), Some("12"));
        tool.set_attr("Pocket", "13");
        assert_eq!(tool.attrs().len(), 1);
        assert_eq!(tool.remove_attr("Pocket").as_deref(), Some("13"));
        assert!(tool.get_attr("Pocket").is_none());

        assert!(!tool.set_attr("Notes", "lost"));
        assert!(tool.attrs().is_empty());
    }

    #[test]
    fn test_fresh_ids_differ() {
        assert_ne!(Tool::default().id, Tool::default().id);
    }

    #[test]
    fn test_material_names() {
        assert_eq!(ToolMaterial::from_name("hss"), Some(ToolMaterial::Hss));
        assert_eq!(ToolMaterial::Carbide.to_string(), "Carbide");
        assert_eq!(ToolMaterial::from_name("wood"), None);
    }
}
