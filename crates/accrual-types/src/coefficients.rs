//! Governance-controlled polynomial coefficients.
//!
//! The compound model evaluates
//!
//! ```text
//! rate / ID = 1 + a/CD + (b/CD)·x + (c/CD)·x² + (d/CD)·x³ + (e/CD)·x⁴ + (f/CD)·x⁵
//! ```
//!
//! where `x = utilization / ID`. Coefficients are signed so governance can
//! shape the curve; bounding them is a deployment concern.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TypesError;

/// Number of polynomial coefficients (degree 5 plus constant).
pub const COEFFICIENT_COUNT: usize = 6;

/// Ordered coefficients `[a, b, c, d, e, f]`, each scaled by
/// [`COEFFICIENT_DENOMINATION`](crate::COEFFICIENT_DENOMINATION).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientSet(pub [i64; COEFFICIENT_COUNT]);

/// Named coefficient presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// ~2% APR base, linear up to ~12% at full utilization.
    Conservative,
    /// ~1% APR base, gentle slope, steep quintic tail (~66% at full).
    Standard,
    /// ~2% APR base, quadratic and quintic terms (~230% at full).
    Aggressive,
}

impl CoefficientSet {
    pub const fn new(coefficients: [i64; COEFFICIENT_COUNT]) -> Self {
        Self(coefficients)
    }

    pub fn conservative() -> Self {
        Self([913, 4_566, 0, 0, 0, 0])
    }

    pub fn standard() -> Self {
        Self([457, 2_283, 0, 0, 0, 27_397])
    }

    pub fn aggressive() -> Self {
        Self([913, 4_566, 9_132, 0, 0, 91_324])
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Conservative => Self::conservative(),
            Preset::Standard => Self::standard(),
            Preset::Aggressive => Self::aggressive(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Conservative, Preset::Standard, Preset::Aggressive];
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Preset::Conservative => "conservative",
            Preset::Standard => "standard",
            Preset::Aggressive => "aggressive",
        };
        f.write_str(name)
    }
}

impl FromStr for Preset {
    type Err = TypesError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "conservative" => Ok(Preset::Conservative),
            "standard" => Ok(Preset::Standard),
            "aggressive" => Ok(Preset::Aggressive),
            other => Err(TypesError::InvalidIdentifier(format!("unknown preset: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_have_six_terms() {
        for preset in Preset::ALL {
            let set = CoefficientSet::from_preset(preset);
            assert_eq!(set.iter().count(), COEFFICIENT_COUNT);
            assert!(set.0[0] >= 0, "{preset} base must not be negative");
        }
    }

    #[test]
    fn test_preset_parse_roundtrip() {
        for preset in Preset::ALL {
            let parsed: Preset = preset.to_string().parse().expect("parse");
            assert_eq!(parsed, preset);
        }
        assert!("reckless".parse::<Preset>().is_err());
    }

    #[test]
    fn test_coefficients_serialize_as_array() {
        let set = CoefficientSet::new([0, 10_000, 0, 0, 0, 0]);
        let json = serde_json::to_string(&set).expect("serialize");
        assert_eq!(json, "[0,10000,0,0,0,0]");
    }
}
