//! Tool shapes and their geometric parameters
//!
//! A shape is one of the built-in cutter kinds plus an ordered list of
//! named parameters. Parameter order follows the kind's definition table
//! so editors always present fields in the same order.

use crate::error::{Result, ToolError};
use crate::units::{format_angle, format_length, parse_angle, parse_length, MeasurementSystem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Ball end mill
    Ballend,
    /// Bull nose end mill
    Bullnose,
    /// Chamfer mill
    Chamfer,
    /// Twist drill
    Drill,
    /// Flat end mill
    Endmill,
    /// Touch probe
    Probe,
    /// Slitting saw
    Slittingsaw,
    /// Thread mill
    Threadmill,
    /// Torus (corner radius) mill
    Torus,
    /// V-bit engraver
    Vbit,
}

impl ShapeKind {
    /// Get all shape kinds
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Ballend,
            ShapeKind::Bullnose,
            ShapeKind::Chamfer,
            ShapeKind::Drill,
            ShapeKind::Endmill,
            ShapeKind::Probe,
            ShapeKind::Slittingsaw,
            ShapeKind::Threadmill,
            ShapeKind::Torus,
            ShapeKind::Vbit,
        ]
    }

    /// Lowercase identifier, as used in tool files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ballend => "ballend",
            Self::Bullnose => "bullnose",
            Self::Chamfer => "chamfer",
            Self::Drill => "drill",
            Self::Endmill => "endmill",
            Self::Probe => "probe",
            Self::Slittingsaw => "slittingsaw",
            Self::Threadmill => "thread-mill",
            Self::Torus => "torus",
            Self::Vbit => "v-bit",
        }
    }

    /// Shape file name referenced from `.fctb` documents
    pub fn file_name(&self) -> String {
        format!("{}.fcstd", self.name())
    }

    /// Resolve a shape from its identifier or its file name
    pub fn from_name(name: &str) -> Option<Self> {
        let stem = name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(name)
            .trim_end_matches(".fcstd")
            .to_lowercase();
        Self::all().iter().copied().find(|k| {
            k.name() == stem || k.name().replace('-', "") == stem.replace(['-', '_'], "")
        })
    }

    /// Whether the tool rotates and cuts (probes do neither)
    pub fn is_cutter(&self) -> bool {
        !matches!(self, Self::Probe)
    }

    fn definition(&self) -> &'static [(&'static str, ParamType, f64)] {
        use ParamType::{Angle, Length};
        match self {
            Self::Ballend | Self::Endmill => &[
                ("Diameter", Length, 6.0),
                ("CuttingEdgeHeight", Length, 20.0),
                ("Length", Length, 50.0),
                ("ShankDiameter", Length, 6.0),
            ],
            Self::Bullnose => &[
                ("Diameter", Length, 6.0),
                ("FlatRadius", Length, 2.0),
                ("CuttingEdgeHeight", Length, 20.0),
                ("Length", Length, 50.0),
                ("ShankDiameter", Length, 6.0),
            ],
            Self::Chamfer => &[
                ("Diameter", Length, 12.0),
                ("CuttingEdgeAngle", Angle, 60.0),
                ("CuttingEdgeHeight", Length, 6.0),
                ("FlatRadius", Length, 1.0),
                ("Length", Length, 50.0),
                ("ShankDiameter", Length, 6.0),
            ],
            Self::Drill => &[
                ("Diameter", Length, 3.0),
                ("Length", Length, 50.0),
                ("TipAngle", Angle, 118.0),
            ],
            Self::Probe => &[
                ("Diameter", Length, 6.0),
                ("Length", Length, 50.0),
                ("ShaftDiameter", Length, 4.0),
            ],
            Self::Slittingsaw => &[
                ("Diameter", Length, 50.0),
                ("BladeThickness", Length, 3.0),
                ("CapDiameter", Length, 8.0),
                ("CapHeight", Length, 3.0),
                ("Length", Length, 50.0),
                ("ShankDiameter", Length, 6.0),
            ],
            Self::Threadmill => &[
                ("Diameter", Length, 5.0),
                ("Crest", Length, 0.1),
                ("CuttingAngle", Angle, 60.0),
                ("Length", Length, 50.0),
                ("NeckDiameter", Length, 3.0),
                ("NeckLength", Length, 20.0),
                ("ShankDiameter", Length, 5.0),
            ],
            Self::Torus => &[
                ("Diameter", Length, 6.0),
                ("TorusRadius", Length, 1.0),
                ("CuttingEdgeHeight", Length, 20.0),
                ("Length", Length, 50.0),
                ("ShankDiameter", Length, 6.0),
            ],
            Self::Vbit => &[
                ("Diameter", Length, 12.0),
                ("CuttingEdgeAngle", Angle, 90.0),
                ("CuttingEdgeHeight", Length, 6.0),
                ("Length", Length, 50.0),
                ("ShankDiameter", Length, 6.0),
                ("TipDiameter", Length, 0.2),
            ],
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ballend => write!(f, "Ball End Mill"),
            Self::Bullnose => write!(f, "Bull Nose Mill"),
            Self::Chamfer => write!(f, "Chamfer Mill"),
            Self::Drill => write!(f, "Drill"),
            Self::Endmill => write!(f, "End Mill"),
            Self::Probe => write!(f, "Probe"),
            Self::Slittingsaw => write!(f, "Slitting Saw"),
            Self::Threadmill => write!(f, "Thread Mill"),
            Self::Torus => write!(f, "Torus Mill"),
            Self::Vbit => write!(f, "V-Bit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamType {
    Length,
    Angle,
}

/// A typed parameter value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// Length in millimeters
    Length(f64),
    /// Angle in degrees
    Angle(f64),
}

impl ParamValue {
    /// The raw number (mm or degrees)
    pub fn value(&self) -> f64 {
        match self {
            Self::Length(v) | Self::Angle(v) => *v,
        }
    }

    /// Format for display in the given measurement system
    pub fn format(&self, system: MeasurementSystem) -> String {
        match self {
            Self::Length(v) => format_length(*v, system),
            Self::Angle(v) => format_angle(*v),
        }
    }

    fn same_type(&self, other: &ParamValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Parse text into a value of the same type as `self`
    fn parse_like(&self, text: &str, system: MeasurementSystem) -> std::result::Result<Self, String> {
        match self {
            Self::Length(_) => parse_length(text, system).map(Self::Length),
            Self::Angle(_) => parse_angle(text).map(Self::Angle),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(MeasurementSystem::Metric))
    }
}

/// A named shape parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeParam {
    /// Parameter name, e.g. `CuttingEdgeHeight`
    pub name: String,
    /// Current value
    pub value: ParamValue,
}

/// A tool shape: kind plus its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolShape {
    kind: ShapeKind,
    params: Vec<ShapeParam>,
}

impl ToolShape {
    /// Create a built-in shape with default parameter values
    pub fn builtin(kind: ShapeKind) -> Self {
        let params = kind
            .definition()
            .iter()
            .map(|(name, ty, default)| ShapeParam {
                name: (*name).to_string(),
                value: match ty {
                    ParamType::Length => ParamValue::Length(*default),
                    ParamType::Angle => ParamValue::Angle(*default),
                },
            })
            .collect();
        Self { kind, params }
    }

    /// Create a built-in shape from its identifier or file name
    pub fn from_name(name: &str) -> Result<Self> {
        ShapeKind::from_name(name)
            .map(Self::builtin)
            .ok_or_else(|| {
                ToolError::UnknownShape {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Shape kind
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Shape identifier
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Parameters in definition order
    pub fn params(&self) -> impl Iterator<Item = &ShapeParam> {
        self.params.iter()
    }

    /// Look up a parameter value
    pub fn get_param(&self, name: &str) -> Option<ParamValue> {
        self.params.iter().find(|p| p.name == name).map(|p| p.value)
    }

    /// Replace a parameter value; the value type must match the definition
    pub fn set_param(&mut self, name: &str, value: ParamValue) -> Result<()> {
        let shape = self.name();
        let param = self
            .params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ToolError::UnknownParameter {
                shape: shape.to_string(),
                param: name.to_string(),
            })?;
        if !param.value.same_type(&value) {
            return Err(ToolError::InvalidParameter {
                param: name.to_string(),
                value: value.to_string(),
                reason: "wrong quantity type".to_string(),
            }
            .into());
        }
        param.value = value;
        Ok(())
    }

    /// Parse a quantity string ("6 mm", "1/4 in", "90 °") into a parameter
    pub fn set_param_from_str(
        &mut self,
        name: &str,
        text: &str,
        system: MeasurementSystem,
    ) -> Result<()> {
        let current = self.get_param(name).ok_or_else(|| ToolError::UnknownParameter {
            shape: self.name().to_string(),
            param: name.to_string(),
        })?;
        let value = current
            .parse_like(text, system)
            .map_err(|reason| ToolError::InvalidParameter {
                param: name.to_string(),
                value: text.to_string(),
                reason,
            })?;
        self.set_param(name, value)
    }

    /// Cutting diameter in millimeters
    pub fn diameter(&self) -> Option<f64> {
        self.get_param("Diameter").map(|v| v.value())
    }
}

impl Default for ToolShape {
    fn default() -> Self {
        Self::builtin(ShapeKind::Endmill)
    }
}

/// Human readable label for a parameter name: `CuttingEdgeHeight` -> `Cutting edge height`
pub fn param_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.extend(c.to_lowercase());
        } else {
            label.push(c);
        }
    }
    label
}
