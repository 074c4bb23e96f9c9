//! Billing cycle definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Recurrence unit of a subscription: monthly, yearly, or a one-time
/// lifetime purchase.
///
/// The order `monthly < yearly < oneTime` drives switch classification.
/// `oneTime` is a terminal, non-recurring purchase type rather than a
/// longer commitment on the recurring axis - it has no period end to pivot
/// a scheduled change from, which is why the availability rules block
/// moves off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
    OneTime,
}

impl BillingCycle {
    /// All cycles in ascending order.
    pub const ALL: [BillingCycle; 3] = [
        BillingCycle::Monthly,
        BillingCycle::Yearly,
        BillingCycle::OneTime,
    ];

    /// Returns the numeric rank of this cycle for comparison.
    pub fn rank(&self) -> u8 {
        match self {
            BillingCycle::Monthly => 0,
            BillingCycle::Yearly => 1,
            BillingCycle::OneTime => 2,
        }
    }

    /// Returns true for cycles that renew; false only for `OneTime`.
    pub fn is_recurring(&self) -> bool {
        !matches!(self, BillingCycle::OneTime)
    }

    /// Returns the wire name used in subscription records.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
            BillingCycle::OneTime => "oneTime",
        }
    }
}

impl Default for BillingCycle {
    /// Subscription records without an explicit cycle are treated as
    /// monthly, matching the platform's historical records.
    fn default() -> Self {
        BillingCycle::Monthly
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = ValidationError;

    /// Parses a wire-format cycle name, failing fast on anything outside
    /// the known enumeration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            "oneTime" => Ok(BillingCycle::OneTime),
            other => Err(ValidationError::invalid_enum_value("BillingCycle", other)),
        }
    }
}
