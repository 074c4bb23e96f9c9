//! Plan level definitions.
//!
//! The entitlement hierarchy of the GymPro catalog. Order encodes how much
//! a plan offers, not chronology.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Plan entitlement level.
///
/// Exactly one total order exists: `free < starter < pro < premium`.
/// The derived `Ord` follows declaration order and `rank()` exposes the
/// same order numerically, so precedence rules read as comparisons instead
/// of array-index arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanLevel {
    /// Entry tier - one gym, limited members, no paid features.
    Free,

    /// Starter tier for single-gym operators.
    Starter,

    /// Pro tier - multiple gyms, automation, API access.
    Pro,

    /// Premium tier - multi-location chains, white label, dedicated support.
    Premium,
}

impl PlanLevel {
    /// All levels in ascending entitlement order.
    pub const ALL: [PlanLevel; 4] = [
        PlanLevel::Free,
        PlanLevel::Starter,
        PlanLevel::Pro,
        PlanLevel::Premium,
    ];

    /// Returns the numeric rank of this level for comparison.
    ///
    /// Higher rank = more entitlement. Consistent with the derived `Ord`.
    pub fn rank(&self) -> u8 {
        match self {
            PlanLevel::Free => 0,
            PlanLevel::Starter => 1,
            PlanLevel::Pro => 2,
            PlanLevel::Premium => 3,
        }
    }

    /// Returns true if this level is a paid tier.
    pub fn is_paid(&self) -> bool {
        !matches!(self, PlanLevel::Free)
    }

    /// Returns the display name for this level.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanLevel::Free => "Free",
            PlanLevel::Starter => "Starter",
            PlanLevel::Pro => "Pro",
            PlanLevel::Premium => "Premium",
        }
    }

    /// Returns the wire name used in catalog data.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanLevel::Free => "free",
            PlanLevel::Starter => "starter",
            PlanLevel::Pro => "pro",
            PlanLevel::Premium => "premium",
        }
    }
}

impl fmt::Display for PlanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PlanLevel {
    type Err = ValidationError;

    /// Parses a wire-format level name, failing fast on anything outside
    /// the known enumeration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PlanLevel::Free),
            "starter" => Ok(PlanLevel::Starter),
            "pro" => Ok(PlanLevel::Pro),
            "premium" => Ok(PlanLevel::Premium),
            other => Err(ValidationError::invalid_enum_value("PlanLevel", other)),
        }
    }
}
