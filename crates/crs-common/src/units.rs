//! Units of measure attached to parameter descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical unit tag of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Metre,
    Degree,
    Radian,
    ArcSecond,
    PartsPerMillion,
    /// Dimensionless ratio (scale factors, logarithm bases)
    Unity,
    /// Values with no unit at all (file names, integers like `dim`)
    None,
}

impl Unit {
    /// Multiplier converting a value in this unit to its SI base unit
    /// (metre, radian, or unity).
    pub fn to_si_factor(&self) -> f64 {
        match self {
            Unit::Metre | Unit::Radian | Unit::Unity | Unit::None => 1.0,
            Unit::Degree => std::f64::consts::PI / 180.0,
            Unit::ArcSecond => std::f64::consts::PI / (180.0 * 3600.0),
            Unit::PartsPerMillion => 1e-6,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Metre => "m",
            Unit::Degree => "°",
            Unit::Radian => "rad",
            Unit::ArcSecond => "″",
            Unit::PartsPerMillion => "ppm",
            Unit::Unity => "",
            Unit::None => "",
        }
    }

    pub fn is_angular(&self) -> bool {
        matches!(self, Unit::Degree | Unit::Radian | Unit::ArcSecond)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Unit::Metre => "metre",
            Unit::Degree => "degree",
            Unit::Radian => "radian",
            Unit::ArcSecond => "arc-second",
            Unit::PartsPerMillion => "parts per million",
            Unit::Unity => "unity",
            Unit::None => "none",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_si_factors() {
        assert!((Unit::Degree.to_si_factor() * 180.0 - std::f64::consts::PI).abs() < 1e-15);
        assert!((Unit::ArcSecond.to_si_factor() * 3600.0 - Unit::Degree.to_si_factor()).abs() < 1e-18);
        assert_eq!(Unit::PartsPerMillion.to_si_factor(), 1e-6);
        assert_eq!(Unit::Metre.to_si_factor(), 1.0);
    }

    #[test]
    fn test_angular() {
        assert!(Unit::ArcSecond.is_angular());
        assert!(!Unit::PartsPerMillion.is_angular());
    }
}
