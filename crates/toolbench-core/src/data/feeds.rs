//! Feeds and speeds calculation
//!
//! Derives spindle speed and feed rates from a tool and a work-piece
//! material:
//! - `rpm = vc * 1000 / (pi * D)`, clamped to the spindle limits
//! - `feed = rpm * flutes * chipload`
//! - `plunge = feed / 2`

use super::materials::WorkMaterial;
use super::tool::Tool;
use crate::error::{Result, ToolError};
use serde::{Deserialize, Serialize};

/// Flute count assumed when the tool does not specify one
pub const DEFAULT_FLUTES: u32 = 2;

/// Spindle speed range of the machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpindleLimits {
    /// Lowest usable spindle speed
    pub min_rpm: f64,
    /// Highest usable spindle speed
    pub max_rpm: f64,
}

impl SpindleLimits {
    /// Finite, non-negative and ordered
    pub fn is_valid(&self) -> bool {
        self.min_rpm.is_finite()
            && self.max_rpm.is_finite()
            && self.min_rpm >= 0.0
            && self.max_rpm >= self.min_rpm
    }
}

impl Default for SpindleLimits {
    fn default() -> Self {
        Self {
            min_rpm: 1000.0,
            max_rpm: 24000.0,
        }
    }
}

/// Calculated cutting parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedsResult {
    /// Spindle speed
    pub rpm: f64,
    /// Effective surface speed in m/min (after clamping)
    pub surface_speed: f64,
    /// Chip load used, mm/tooth
    pub chipload: f64,
    /// Flute count used
    pub flutes: u32,
    /// Feed rate in mm/min
    pub feed_rate: f64,
    /// Plunge rate in mm/min
    pub plunge_rate: f64,
    /// Recommended depth of cut in mm
    pub depth_of_cut: f64,
    /// Whether the ideal rpm fell outside the spindle limits
    pub rpm_clamped: bool,
}

/// Feeds and speeds calculator
pub struct FeedsCalculator;

impl FeedsCalculator {
    /// Calculate cutting parameters for a tool in a material
    pub fn calculate(
        tool: &Tool,
        material: &WorkMaterial,
        limits: SpindleLimits,
    ) -> Result<FeedsResult> {
        let diameter = match tool.get_diameter() {
            Some(d) if tool.supports_feeds_and_speeds() => d,
            _ => {
                return Err(ToolError::FeedsNotSupported {
                    label: tool.get_label().to_string(),
                }
                .into())
            }
        };

        let limits = if limits.is_valid() {
            limits
        } else {
            tracing::warn!("Invalid spindle limits {:?}, using defaults", limits);
            SpindleLimits::default()
        };

        let ideal_speed = material.surface_speed(tool.material);
        let ideal_rpm = ideal_speed * 1000.0 / (std::f64::consts::PI * diameter);
        let rpm = ideal_rpm.clamp(limits.min_rpm, limits.max_rpm);
        let rpm_clamped = rpm != ideal_rpm;
        let surface_speed = if rpm_clamped {
            rpm * std::f64::consts::PI * diameter / 1000.0
        } else {
            ideal_speed
        };

        let chipload = tool
            .chipload
            .filter(|c| *c > 0.0)
            .unwrap_or(diameter * material.chipload_factor);
        let flutes = tool.flutes.filter(|f| *f > 0).unwrap_or(DEFAULT_FLUTES);
        let feed_rate = rpm * f64::from(flutes) * chipload;

        Ok(FeedsResult {
            rpm,
            surface_speed,
            chipload,
            flutes,
            feed_rate,
            plunge_rate: feed_rate / 2.0,
            depth_of_cut: diameter * material.max_doc_factor,
            rpm_clamped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::materials::standard_materials;
    use crate::data::shape::{ParamValue, ShapeKind, ToolShape};
    use crate::data::tool::ToolMaterial;

    fn material(id: &str) -> WorkMaterial {
        standard_materials()
            .into_iter()
            .find(|m| m.id.0 == id)
            .unwrap()
    }

    fn endmill(diameter: f64) -> Tool {
        let mut tool = Tool::new("endmill", ToolShape::builtin(ShapeKind::Endmill));
        tool.shape
            .set_param("Diameter", ParamValue::Length(diameter))
            .unwrap();
        tool
    }

    #[test]
    fn test_unclamped_rpm() {
        let mut tool = endmill(10.0);
        tool.material = ToolMaterial::Hss;
        tool.flutes = Some(3);
        tool.chipload = Some(0.05);

        let result =
            FeedsCalculator::calculate(&tool, &material("aluminium"), SpindleLimits::default())
                .unwrap();
        let expected_rpm = 90.0 * 1000.0 / (std::f64::consts::PI * 10.0);
        assert!((result.rpm - expected_rpm).abs() < 1e-6);
        assert!(!result.rpm_clamped);
        assert_eq!(result.flutes, 3);
        assert!((result.feed_rate - expected_rpm * 3.0 * 0.05).abs() < 1e-6);
        assert!((result.plunge_rate * 2.0 - result.feed_rate).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_rpm_recomputes_surface_speed() {
        let tool = endmill(3.0);
        let limits = SpindleLimits {
            min_rpm: 5000.0,
            max_rpm: 12000.0,
        };
        let result = FeedsCalculator::calculate(&tool, &material("softwood"), limits).unwrap();
        assert!(result.rpm_clamped);
        assert_eq!(result.rpm, 12000.0);
        assert!(result.surface_speed < 600.0);
        // derived chipload when tool has none
        assert!((result.chipload - 3.0 * 0.012).abs() < 1e-12);
        assert_eq!(result.flutes, DEFAULT_FLUTES);
    }

    #[test]
    fn test_invalid_limits_fall_back_to_defaults() {
        let tool = endmill(6.0);
        let softwood = material("softwood");
        let expected =
            FeedsCalculator::calculate(&tool, &softwood, SpindleLimits::default()).unwrap();
        for limits in [
            SpindleLimits {
                min_rpm: f64::NAN,
                max_rpm: 24000.0,
            },
            SpindleLimits {
                min_rpm: 1000.0,
                max_rpm: f64::INFINITY,
            },
            SpindleLimits {
                min_rpm: 20000.0,
                max_rpm: 5000.0,
            },
        ] {
            assert!(!limits.is_valid());
            let result = FeedsCalculator::calculate(&tool, &softwood, limits).unwrap();
            assert_eq!(result, expected);
        }
    }

    #[test]
    fn test_probe_rejected() {
        let probe = Tool::new("probe", ToolShape::builtin(ShapeKind::Probe));
        let err =
            FeedsCalculator::calculate(&probe, &material("mdf"), SpindleLimits::default())
                .unwrap_err();
        assert!(err.to_string().contains("does not support feeds and speeds"));
    }
}
