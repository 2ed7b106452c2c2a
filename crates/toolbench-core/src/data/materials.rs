//! Work-piece materials used for feeds and speeds
//!
//! Each material carries the recommended surface speed per tool material
//! and factors used to derive chip load and depth of cut from the tool
//! diameter when the tool does not specify them.

use super::tool::ToolMaterial;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Material categories for organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialCategory {
    /// Natural wood (hardwoods, softwoods)
    Wood,
    /// Engineered wood products
    EngineeredWood,
    /// Plastic and polymer materials
    Plastic,
    /// Non-ferrous metals (aluminum, brass, copper)
    NonFerrousMetal,
    /// Ferrous metals (steel, stainless)
    FerrousMetal,
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wood => write!(f, "Wood"),
            Self::EngineeredWood => write!(f, "Engineered Wood"),
            Self::Plastic => write!(f, "Plastic"),
            Self::NonFerrousMetal => write!(f, "Non-Ferrous Metal"),
            Self::FerrousMetal => write!(f, "Ferrous Metal"),
        }
    }
}

/// Material identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub String);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A work-piece material with cutting recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkMaterial {
    /// Unique material identifier
    pub id: MaterialId,
    /// Display name
    pub name: String,
    /// Material category
    pub category: MaterialCategory,
    /// Surface speed for HSS tools in m/min
    pub surface_speed_hss: f64,
    /// Surface speed for carbide tools in m/min
    pub surface_speed_carbide: f64,
    /// Chip load as a fraction of the tool diameter (mm/tooth per mm)
    pub chipload_factor: f64,
    /// Depth of cut as a fraction of the tool diameter
    pub max_doc_factor: f64,
}

impl WorkMaterial {
    /// Recommended surface speed for the given tool material, in m/min
    pub fn surface_speed(&self, tool_material: ToolMaterial) -> f64 {
        match tool_material {
            ToolMaterial::Hss => self.surface_speed_hss,
            ToolMaterial::Carbide => self.surface_speed_carbide,
        }
    }
}

fn material(
    id: &str,
    name: &str,
    category: MaterialCategory,
    hss: f64,
    carbide: f64,
    chipload_factor: f64,
    max_doc_factor: f64,
) -> WorkMaterial {
    WorkMaterial {
        id: MaterialId(id.to_string()),
        name: name.to_string(),
        category,
        surface_speed_hss: hss,
        surface_speed_carbide: carbide,
        chipload_factor,
        max_doc_factor,
    }
}

/// Standard material table
pub fn standard_materials() -> Vec<WorkMaterial> {
    use MaterialCategory::*;
    vec![
        material("softwood", "Softwood", Wood, 300.0, 600.0, 0.012, 1.0),
        material("hardwood", "Hardwood", Wood, 200.0, 450.0, 0.010, 0.75),
        material("mdf", "MDF", EngineeredWood, 250.0, 500.0, 0.012, 1.0),
        material("acrylic", "Acrylic", Plastic, 150.0, 300.0, 0.008, 0.5),
        material("aluminium", "Aluminium", NonFerrousMetal, 90.0, 250.0, 0.005, 0.5),
        material("brass", "Brass", NonFerrousMetal, 60.0, 150.0, 0.004, 0.3),
        material("mild_steel", "Mild Steel", FerrousMetal, 25.0, 100.0, 0.003, 0.2),
        material("stainless", "Stainless Steel", FerrousMetal, 15.0, 70.0, 0.002, 0.1),
    ]
}
