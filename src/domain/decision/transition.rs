//! Plan transition classification.
//!
//! When a member with an existing subscription picks a different plan or
//! billing cycle, the checkout flow, the authorization layer, and the UI
//! all need to agree on what kind of change was requested. The classifier
//! is the single place that decision is made.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{BillingCycle, PlanLevel};

/// The categorical label for a requested plan/cycle change.
///
/// Computed, never stored: classification is re-derived from the freshest
/// subscription snapshot on every selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionClass {
    /// Target level is higher. Applies immediately with proration.
    Upgrade,
    /// Same cycle, lower level. Scheduled for period end.
    Downgrade,
    /// Same or lower level, longer cycle (e.g. monthly to yearly).
    SwitchUp,
    /// Same or lower level, shorter cycle (e.g. yearly to monthly).
    SwitchDown,
    /// Identical level and cycle. Nothing to do.
    Same,
}

impl TransitionClass {
    /// Returns the wire name for this class.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionClass::Upgrade => "upgrade",
            TransitionClass::Downgrade => "downgrade",
            TransitionClass::SwitchUp => "switch_up",
            TransitionClass::SwitchDown => "switch_down",
            TransitionClass::Same => "same",
        }
    }

    /// How the checkout flow commits a transition of this class.
    pub fn commit_strategy(&self) -> CommitStrategy {
        match self {
            TransitionClass::Upgrade => CommitStrategy::ApplyImmediately,
            TransitionClass::Downgrade | TransitionClass::SwitchDown => {
                CommitStrategy::ScheduleAtPeriodEnd
            }
            TransitionClass::SwitchUp => CommitStrategy::CallerPolicy,
            TransitionClass::Same => CommitStrategy::NoOp,
        }
    }
}

impl std::fmt::Display for TransitionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// When a classified transition takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStrategy {
    /// Charge the prorated difference now and swap entitlements at once.
    ApplyImmediately,
    /// Write a pending change; entitlements stay untouched until rollover.
    ScheduleAtPeriodEnd,
    /// The engine only classifies; the calling flow decides whether a
    /// cycle lengthening applies now or at period end.
    CallerPolicy,
    /// Nothing to commit.
    NoOp,
}

/// Classifies a requested plan/cycle change relative to the current one.
pub struct TransitionClassifier;

impl TransitionClassifier {
    /// Returns the one transition class for the requested change.
    ///
    /// Level and cycle can change in the same selection, so the branches
    /// are ordered by precedence and the first match wins:
    ///
    /// 1. Level raised: `Upgrade`. A level upgrade dominates any
    ///    simultaneous cycle change - starter-monthly to premium-yearly is
    ///    an upgrade, not a switch.
    /// 2. Cycle lengthened: `SwitchUp`.
    /// 3. Cycle shortened: `SwitchDown`. This also wins over a
    ///    simultaneous level drop - pro-yearly to starter-monthly reads as
    ///    a cycle switch, not a downgrade.
    /// 4. Level lowered on the same cycle: `Downgrade`.
    /// 5. Otherwise the pair is identical: `Same`.
    ///
    /// Total and deterministic over the enumerations; pricing never enters
    /// the decision.
    pub fn classify(
        current_level: PlanLevel,
        current_cycle: BillingCycle,
        target_level: PlanLevel,
        target_cycle: BillingCycle,
    ) -> TransitionClass {
        if target_level > current_level {
            return TransitionClass::Upgrade;
        }
        if target_cycle > current_cycle {
            return TransitionClass::SwitchUp;
        }
        if target_cycle < current_cycle {
            return TransitionClass::SwitchDown;
        }
        if target_level < current_level {
            return TransitionClass::Downgrade;
        }
        TransitionClass::Same
    }
}
