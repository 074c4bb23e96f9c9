//! Plan availability evaluation.
//!
//! Decides whether a member may select a given plan/cycle right now. Every
//! outcome, including "blocked", is a regular value the UI renders; nothing
//! here is an error condition.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{BillingCycle, Plan};
use crate::domain::subscription::Subscription;

/// Why a plan/cycle selection is currently blocked.
///
/// A closed variant rather than free-form strings, so every blocking
/// reason is guaranteed reachable by the rules below and no rendering path
/// can silently fall through to an unblocked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockingReason {
    /// The member already holds exactly this plan on this cycle.
    AlreadySubscribed,
    /// A lifetime purchase cannot move onto a recurring plan; there is no
    /// period end to schedule the change from.
    LifetimeToSubscriptionBlocked,
    /// A lifetime purchase cannot move to an equal or lower lifetime tier.
    LifetimeDowngradeBlocked,
}

impl BlockingReason {
    /// Returns the wire name for this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockingReason::AlreadySubscribed => "already_subscribed",
            BlockingReason::LifetimeToSubscriptionBlocked => "lifetime_to_subscription_blocked",
            BlockingReason::LifetimeDowngradeBlocked => "lifetime_downgrade_blocked",
        }
    }
}

/// Whether a candidate selection is currently allowed.
///
/// Recomputed on every render/selection from the freshest subscription
/// snapshot; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityDecision {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<BlockingReason>,
}

impl AvailabilityDecision {
    /// The selection is allowed.
    pub fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    /// The selection is blocked for the given reason.
    pub fn blocked(reason: BlockingReason) -> Self {
        Self {
            available: false,
            reason: Some(reason),
        }
    }
}

/// Evaluates whether selecting a plan/cycle is currently allowed.
pub struct AvailabilityEvaluator;

impl AvailabilityEvaluator {
    /// Returns the availability decision for a candidate selection.
    ///
    /// Rules in order, first match wins:
    ///
    /// 1. No current subscription: available (new customer).
    /// 2. Subscription without a resolvable plan: available (treated as
    ///    the no-subscription case).
    /// 3. Exact plan-id and cycle match: blocked `already_subscribed`.
    ///    Strict pair equality - the same plan on another cycle is not
    ///    blocked by this rule.
    /// 4. Current cycle is one-time:
    ///    a. one-time target at a strictly higher level: available
    ///       (lifetime tier upgrade); any other one-time target is
    ///       blocked `lifetime_downgrade_blocked`.
    ///    b. recurring target: blocked `lifetime_to_subscription_blocked`.
    /// 5. Everything else: available.
    pub fn evaluate(
        subscription: Option<&Subscription>,
        target_plan: &Plan,
        target_cycle: BillingCycle,
    ) -> AvailabilityDecision {
        let Some(subscription) = subscription else {
            return AvailabilityDecision::available();
        };
        let Some(current_plan) = subscription.plan.as_ref() else {
            return AvailabilityDecision::available();
        };
        let current_cycle = subscription.billing_cycle;

        if current_plan.plan_id == target_plan.plan_id && current_cycle == target_cycle {
            return AvailabilityDecision::blocked(BlockingReason::AlreadySubscribed);
        }

        if current_cycle == BillingCycle::OneTime {
            if target_cycle == BillingCycle::OneTime {
                return if target_plan.level > current_plan.level {
                    AvailabilityDecision::available()
                } else {
                    AvailabilityDecision::blocked(BlockingReason::LifetimeDowngradeBlocked)
                };
            }
            return AvailabilityDecision::blocked(BlockingReason::LifetimeToSubscriptionBlocked);
        }

        AvailabilityDecision::available()
    }
}
