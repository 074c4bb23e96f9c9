//! Subscription status state machine.
//!
//! Defines the subscription lifecycle states and the transitions the
//! billing flows may perform between them.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Current state of a subscription in the billing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Paid and current. Full access.
    Active,

    /// In the free trial window. Full access until the trial ends.
    Trialing,

    /// Period ended without renewal. No access until resubscribed.
    Expired,

    /// Cancellation requested. Access continues until period end.
    Cancelled,
}

impl SubscriptionStatus {
    /// Returns true if this status grants access to the application.
    ///
    /// Cancelled still grants access because cancellation takes effect at
    /// period end; the aggregate narrows this with the actual period check.
    pub fn grants_access(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing | SubscriptionStatus::Cancelled
        )
    }

    /// Returns the wire name used in subscription records.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // From TRIALING
            (Trialing, Active) // Trial converts to paid
                | (Trialing, Expired)
                | (Trialing, Cancelled)
            // From ACTIVE
                | (Active, Active) // Renewal
                | (Active, Cancelled)
                | (Active, Expired)
            // From CANCELLED
                | (Cancelled, Active) // Reactivation before period end
                | (Cancelled, Expired)
            // From EXPIRED
                | (Expired, Active) // Resubscribe
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Trialing => vec![Active, Expired, Cancelled],
            Active => vec![Active, Cancelled, Expired],
            Cancelled => vec![Active, Expired],
            Expired => vec![Active],
        }
    }
}
