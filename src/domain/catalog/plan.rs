//! Plan catalog entry.
//!
//! A Plan is an immutable catalog record created by seeding; the engine
//! only ever reads it. Mutation (repricing, retiring) happens upstream by
//! publishing a new catalog version.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PlanId;

use super::{BillingCycle, PlanLevel, PlanLimits, PlanPricing, SupportedCurrency};

/// Purchase type of a catalog entry.
///
/// `Subscription` plans recur monthly or yearly; `OneTime` plans are a
/// single lifetime purchase priced only on the `oneTime` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanType {
    Subscription,
    OneTime,
}

/// Immutable plan catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Stable catalog identifier (e.g. `subscription-starter`).
    pub plan_id: PlanId,

    /// Catalog revision this entry belongs to.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Sort position on pricing surfaces.
    pub order: Option<u32>,

    /// Purchase type.
    #[serde(rename = "type")]
    pub plan_type: PlanType,

    /// Entitlement level.
    pub level: PlanLevel,

    /// Display name (a translation key on the wire).
    pub name: String,

    /// Display description (a translation key on the wire).
    pub description: Option<String>,

    /// Per-currency pricing table.
    pub pricing: PlanPricing,

    /// Trial length in days; subscription plans only.
    pub trial_days: Option<u32>,

    /// Resource ceilings.
    #[serde(default)]
    pub limits: PlanLimits,

    /// Feature list (translation keys on the wire).
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_version() -> u32 {
    1
}

impl Plan {
    /// Returns true for one-time (lifetime) plans.
    pub fn is_one_time(&self) -> bool {
        matches!(self.plan_type, PlanType::OneTime)
    }

    /// Returns the price in a currency for a cycle, if sold on it.
    pub fn price(&self, currency: SupportedCurrency, cycle: BillingCycle) -> Option<u64> {
        self.pricing.price(currency, cycle)
    }

    /// Returns the cycles this plan is actually sold on.
    pub fn offered_cycles(&self) -> Vec<BillingCycle> {
        match self.plan_type {
            PlanType::Subscription => vec![BillingCycle::Monthly, BillingCycle::Yearly],
            PlanType::OneTime => vec![BillingCycle::OneTime],
        }
    }
}
