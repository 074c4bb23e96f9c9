//! PlanSelectionHandler - Query handler for the per-plan selection view.
//!
//! The pricing surfaces render one card per catalog plan. For each card
//! they need four answers at once: may it be selected, what transition
//! would selecting it request, what should the control do, and what
//! countdown applies to the current subscription. This handler composes
//! the domain decision services into that single view.

use tracing::debug;

use crate::domain::catalog::{BillingCycle, Plan};
use crate::domain::decision::{
    AvailabilityDecision, AvailabilityEvaluator, BlockingReason, CommitStrategy,
    RemainingTimeProjection, RemainingTimeProjector, TransitionClass, TransitionClassifier,
};
use crate::domain::foundation::Timestamp;
use crate::domain::subscription::Subscription;

/// Query describing one candidate plan card.
///
/// The subscription snapshot must be the freshest fetched state; the
/// handler recomputes everything on every call and caches nothing across
/// a mutation boundary.
#[derive(Debug, Clone)]
pub struct PlanSelectionQuery {
    pub subscription: Option<Subscription>,
    pub target_plan: Plan,
    pub target_cycle: BillingCycle,
    pub now: Timestamp,
}

/// What the selection control for a candidate plan should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// First subscription for this member; plain checkout.
    Subscribe,
    /// This is the member's current plan/cycle; render as current, disabled.
    Current,
    /// Blocked for the given reason; render disabled.
    Unavailable(BlockingReason),
    /// A change is already scheduled; everything except the current plan
    /// and immediate upgrades waits until it resolves or is cancelled.
    ChangePending,
    /// Selectable; commit according to the transition's strategy.
    Select {
        transition: TransitionClass,
        commit: CommitStrategy,
    },
}

/// Result of evaluating one candidate plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSelectionView {
    /// Whether the candidate may be selected right now.
    pub availability: AvailabilityDecision,
    /// The classified transition, when there is a current plan to
    /// classify against.
    pub transition: Option<TransitionClass>,
    /// The control decision for the card.
    pub action: SelectionAction,
    /// Countdown to period end; absent for new customers and lifetime
    /// grants.
    pub countdown: Option<RemainingTimeProjection>,
}

/// Handler for the plan selection query.
///
/// Called once per visible plan card per render, so it stays synchronous
/// and allocation-light.
pub struct PlanSelectionHandler;

impl PlanSelectionHandler {
    /// Evaluates one candidate plan against the current subscription.
    pub fn handle(query: &PlanSelectionQuery) -> PlanSelectionView {
        let subscription = query.subscription.as_ref();

        let availability =
            AvailabilityEvaluator::evaluate(subscription, &query.target_plan, query.target_cycle);

        let transition = subscription
            .and_then(|sub| sub.plan.as_ref().map(|plan| (plan, sub.billing_cycle)))
            .map(|(current_plan, current_cycle)| {
                TransitionClassifier::classify(
                    current_plan.level,
                    current_cycle,
                    query.target_plan.level,
                    query.target_cycle,
                )
            });

        let action = Self::action(subscription, &availability, transition);
        let countdown = Self::countdown(subscription, query.now);

        debug!(
            target_plan = %query.target_plan.plan_id,
            target_cycle = %query.target_cycle,
            available = availability.available,
            transition = ?transition,
            "evaluated plan selection"
        );

        PlanSelectionView {
            availability,
            transition,
            action,
            countdown,
        }
    }

    fn action(
        subscription: Option<&Subscription>,
        availability: &AvailabilityDecision,
        transition: Option<TransitionClass>,
    ) -> SelectionAction {
        if let Some(reason) = availability.reason {
            return match reason {
                BlockingReason::AlreadySubscribed => SelectionAction::Current,
                other => SelectionAction::Unavailable(other),
            };
        }

        let Some(transition) = transition else {
            return SelectionAction::Subscribe;
        };

        // A scheduled change freezes further scheduling: only immediate
        // commits (upgrades, and cycle lengthenings the caller may apply
        // immediately) stay actionable until it resolves.
        let has_pending = subscription.map(|s| s.has_pending_change()).unwrap_or(false);
        if has_pending
            && !matches!(
                transition,
                TransitionClass::Upgrade | TransitionClass::SwitchUp
            )
        {
            return SelectionAction::ChangePending;
        }

        SelectionAction::Select {
            transition,
            commit: transition.commit_strategy(),
        }
    }

    fn countdown(
        subscription: Option<&Subscription>,
        now: Timestamp,
    ) -> Option<RemainingTimeProjection> {
        let subscription = subscription?;
        if subscription.is_lifetime(now) {
            // Lifetime access renders its own state, not a countdown.
            return None;
        }
        RemainingTimeProjector::project(subscription.current_period_end, now)
    }
}
