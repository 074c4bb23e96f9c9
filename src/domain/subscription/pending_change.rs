//! Scheduled future plan/cycle change.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::BillingCycle;
use crate::domain::foundation::{PlanId, Timestamp};

/// A plan/cycle change scheduled to take effect at the next period
/// rollover instead of immediately.
///
/// A subscription holds at most one of these; scheduling a new change
/// replaces the previous one. Downgrades and cycle switches are committed
/// this way so entitlements never shrink mid-period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChange {
    /// Target plan of the scheduled change.
    pub plan_id: PlanId,

    /// Target billing cycle of the scheduled change.
    pub billing_cycle: BillingCycle,

    /// When the change takes effect (the current period end at the time
    /// of scheduling).
    pub effective_date: Timestamp,
}

impl PendingChange {
    /// Creates a pending change.
    pub fn new(plan_id: PlanId, billing_cycle: BillingCycle, effective_date: Timestamp) -> Self {
        Self {
            plan_id,
            billing_cycle,
            effective_date,
        }
    }

    /// Returns true if the change targets the given plan/cycle pair.
    pub fn targets(&self, plan_id: &PlanId, billing_cycle: BillingCycle) -> bool {
        &self.plan_id == plan_id && self.billing_cycle == billing_cycle
    }
}
