//! Unit conversion utilities
//!
//! Handles the quantity strings used by tool shape parameters
//! ("6.35 mm", "1/4 in", "90 °"). Lengths are stored in millimeters and
//! angles in degrees; inch input supports decimal and fractional forms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Format a length for display, including the unit suffix
///
/// * `value_mm` - Value in millimeters
/// * `system` - Target measurement system
pub fn format_length(value_mm: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => format!("{:.3} mm", value_mm),
        MeasurementSystem::Imperial => format!("{:.3} in", value_mm / MM_PER_INCH),
    }
}

/// Format an angle in degrees for display
pub fn format_angle(value_deg: f64) -> String {
    format!("{:.3} °", value_deg)
}

/// Parse a length string to millimeters
///
/// An explicit unit suffix (`mm`, `cm`, `in`, `"`) wins over `system`,
/// which only applies to bare numbers.
pub fn parse_length(input: &str, system: MeasurementSystem) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty length".to_string());
    }

    if let Some(number) = input.strip_suffix("mm") {
        return parse_decimal(number);
    }
    if let Some(number) = input.strip_suffix("cm") {
        return parse_decimal(number).map(|v| v * 10.0);
    }
    if let Some(number) = input
        .strip_suffix("in")
        .or_else(|| input.strip_suffix('"'))
    {
        return parse_inches(number).map(|v| v * MM_PER_INCH);
    }

    match system {
        MeasurementSystem::Metric => parse_decimal(input),
        MeasurementSystem::Imperial => parse_inches(input).map(|v| v * MM_PER_INCH),
    }
}

/// Parse an angle string to degrees
///
/// Accepts a trailing `°` or `deg`.
pub fn parse_angle(input: &str) -> Result<f64, String> {
    let input = input.trim();
    let number = input
        .strip_suffix('°')
        .or_else(|| input.strip_suffix("deg"))
        .unwrap_or(input);
    parse_decimal(number)
}

/// Get the unit label for the given system ("mm" or "in")
pub fn get_unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm",
        MeasurementSystem::Imperial => "in",
    }
}

fn parse_decimal(input: &str) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Missing number".to_string());
    }
    let value = input.parse::<f64>().map_err(|e| e.to_string())?;
    if !value.is_finite() {
        return Err("Value must be finite".to_string());
    }
    Ok(value)
}

fn parse_inches(input: &str) -> Result<f64, String> {
    let input = input.trim();
    if !input.contains('/') {
        return parse_decimal(input);
    }

    let negative = input.starts_with('-');
    let unsigned = input.trim_start_matches('-');
    let mut total = 0.0;
    for part in unsigned.split_whitespace() {
        if part.contains('/') {
            let frac_parts: Vec<&str> = part.split('/').collect();
            if frac_parts.len() != 2 {
                return Err("Invalid fraction format".to_string());
            }
            let num = frac_parts[0]
                .parse::<f64>()
                .map_err(|_| "Invalid numerator")?;
            let den = frac_parts[1]
                .parse::<f64>()
                .map_err(|_| "Invalid denominator")?;
            if den == 0.0 {
                return Err("Division by zero".to_string());
            }
            total += num / den;
        } else {
            total += part.parse::<f64>().map_err(|_| "Invalid number part")?;
        }
    }
    Ok(if negative { -total } else { total })
}
