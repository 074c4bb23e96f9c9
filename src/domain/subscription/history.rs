//! Subscription history vocabulary.
//!
//! Every mutation of a subscription is recorded in an append-only history
//! log owned by the platform. The engine does not write the log, but it
//! owns the action vocabulary and the mapping from a classified transition
//! to the action the log records, so the audit trail and the checkout flow
//! cannot drift apart.

use serde::{Deserialize, Serialize};

use crate::domain::decision::TransitionClass;

/// Action recorded in the subscription history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    Upgraded,
    Downgraded,
    Renewed,
    Cancelled,
    Expired,
    Reactivated,
    DowngradeScheduled,
    SwitchScheduled,
    PendingChangeCancelled,
}

impl HistoryAction {
    /// Returns the wire name used in history records.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Created => "created",
            HistoryAction::Upgraded => "upgraded",
            HistoryAction::Downgraded => "downgraded",
            HistoryAction::Renewed => "renewed",
            HistoryAction::Cancelled => "cancelled",
            HistoryAction::Expired => "expired",
            HistoryAction::Reactivated => "reactivated",
            HistoryAction::DowngradeScheduled => "downgrade_scheduled",
            HistoryAction::SwitchScheduled => "switch_scheduled",
            HistoryAction::PendingChangeCancelled => "pending_change_cancelled",
        }
    }

    /// The action the history log records when a classified transition is
    /// committed.
    ///
    /// Upgrades apply immediately and log as `upgraded`; downgrades and
    /// cycle switches are scheduled for period end and log their scheduling.
    /// `same` is a no-op and records nothing.
    pub fn for_transition(class: TransitionClass) -> Option<HistoryAction> {
        match class {
            TransitionClass::Upgrade => Some(HistoryAction::Upgraded),
            TransitionClass::Downgrade => Some(HistoryAction::DowngradeScheduled),
            TransitionClass::SwitchUp | TransitionClass::SwitchDown => {
                Some(HistoryAction::SwitchScheduled)
            }
            TransitionClass::Same => None,
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
