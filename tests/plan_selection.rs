//! End-to-end exercise of the plan engine against the seeded catalog:
//! the wire-format subscription snapshot in, selection views out.

use gympro_plan_engine::application::{
    PlanSelectionHandler, PlanSelectionQuery, SelectionAction,
};
use gympro_plan_engine::domain::catalog::{BillingCycle, Plan, PlanCatalog};
use gympro_plan_engine::domain::decision::{
    BlockingReason, CommitStrategy, TransitionClass, UrgencyTier,
};
use gympro_plan_engine::domain::foundation::{PlanId, Timestamp};
use gympro_plan_engine::domain::subscription::{Subscription, SubscriptionStatus};

fn plan(id: &str) -> Plan {
    PlanCatalog::default_catalog()
        .find(&PlanId::new(id).unwrap())
        .unwrap()
        .clone()
}

fn now() -> Timestamp {
    Timestamp::parse_iso("2026-03-01T00:00:00Z").unwrap()
}

/// A starter-monthly subscription snapshot as the backend serializes it,
/// 36 hours before its period end.
fn starter_monthly_snapshot() -> Subscription {
    let plan_json = serde_json::to_string(&plan("subscription-starter")).unwrap();
    let json = format!(
        r#"{{
            "id": "3db7e9a4-8a2f-41d4-9b11-0d4c7d0d6a01",
            "userId": "manager-77",
            "planId": "subscription-starter",
            "plan": {plan_json},
            "billingCycle": "monthly",
            "status": "active",
            "startDate": "2026-02-01T12:00:00Z",
            "endDate": null,
            "currentPeriodStart": "2026-02-01T12:00:00Z",
            "currentPeriodEnd": "2026-03-02T12:00:00Z",
            "cancelAtPeriodEnd": false,
            "cancelledAt": null,
            "cancellationReason": null,
            "pendingChange": null,
            "trial": null
        }}"#
    );
    serde_json::from_str(&json).unwrap()
}

fn query(sub: Option<Subscription>, target: &str, cycle: BillingCycle) -> PlanSelectionQuery {
    PlanSelectionQuery {
        subscription: sub,
        target_plan: plan(target),
        target_cycle: cycle,
        now: now(),
    }
}

#[test]
fn snapshot_deserializes_with_expected_state() {
    let sub = starter_monthly_snapshot();
    assert_eq!(sub.status, SubscriptionStatus::Active);
    assert_eq!(sub.billing_cycle, BillingCycle::Monthly);
    assert_eq!(sub.plan.as_ref().unwrap().plan_id, sub.plan_id);
}

#[test]
fn new_customer_sees_every_card_as_subscribe() {
    for candidate in PlanCatalog::default_catalog().plans() {
        for cycle in candidate.offered_cycles() {
            let view = PlanSelectionHandler::handle(&PlanSelectionQuery {
                subscription: None,
                target_plan: candidate.clone(),
                target_cycle: cycle,
                now: now(),
            });
            assert!(view.availability.available);
            assert_eq!(view.action, SelectionAction::Subscribe);
        }
    }
}

#[test]
fn upgrade_card_applies_immediately_with_cycle_change() {
    let view = PlanSelectionHandler::handle(&query(
        Some(starter_monthly_snapshot()),
        "subscription-premium",
        BillingCycle::Yearly,
    ));

    assert_eq!(view.transition, Some(TransitionClass::Upgrade));
    assert_eq!(
        view.action,
        SelectionAction::Select {
            transition: TransitionClass::Upgrade,
            commit: CommitStrategy::ApplyImmediately,
        }
    );
}

#[test]
fn yearly_card_of_the_same_plan_is_a_switch_up() {
    let view = PlanSelectionHandler::handle(&query(
        Some(starter_monthly_snapshot()),
        "subscription-starter",
        BillingCycle::Yearly,
    ));

    assert_eq!(view.transition, Some(TransitionClass::SwitchUp));
    assert_eq!(
        view.action,
        SelectionAction::Select {
            transition: TransitionClass::SwitchUp,
            commit: CommitStrategy::CallerPolicy,
        }
    );
}

#[test]
fn own_card_renders_as_current() {
    let view = PlanSelectionHandler::handle(&query(
        Some(starter_monthly_snapshot()),
        "subscription-starter",
        BillingCycle::Monthly,
    ));

    assert_eq!(view.availability.reason, Some(BlockingReason::AlreadySubscribed));
    assert_eq!(view.action, SelectionAction::Current);
}

#[test]
fn countdown_at_36_hours_is_one_day_twelve_hours_critical() {
    let view = PlanSelectionHandler::handle(&query(
        Some(starter_monthly_snapshot()),
        "subscription-pro",
        BillingCycle::Monthly,
    ));

    let countdown = view.countdown.unwrap();
    assert_eq!(countdown.days, 1);
    assert_eq!(countdown.hours, 12);
    assert_eq!(countdown.minutes, 0);
    assert!(!countdown.expired);
    assert_eq!(countdown.urgency(), UrgencyTier::Critical);
}

#[test]
fn scheduled_downgrade_freezes_other_scheduled_moves_until_resolved() {
    let mut sub = starter_monthly_snapshot();
    sub.schedule_change(
        PlanId::new("subscription-free").unwrap(),
        BillingCycle::Monthly,
        Timestamp::parse_iso("2026-03-02T12:00:00Z").unwrap(),
    )
    .unwrap();

    // Cycle lengthenings may still commit immediately, so they stay
    // actionable even with a change pending.
    let switch_up_view = PlanSelectionHandler::handle(&query(
        Some(sub.clone()),
        "subscription-starter",
        BillingCycle::Yearly,
    ));
    assert!(matches!(
        switch_up_view.action,
        SelectionAction::Select { .. }
    ));

    // A second scheduled move is frozen while the first is pending.
    let downgrade_view = PlanSelectionHandler::handle(&query(
        Some(sub.clone()),
        "subscription-free",
        BillingCycle::Monthly,
    ));
    assert_eq!(downgrade_view.action, SelectionAction::ChangePending);

    // Cancelling the pending change unfreezes the card.
    sub.cancel_pending_change().unwrap();
    let after = PlanSelectionHandler::handle(&query(
        Some(sub),
        "subscription-free",
        BillingCycle::Monthly,
    ));
    assert_eq!(
        after.action,
        SelectionAction::Select {
            transition: TransitionClass::Downgrade,
            commit: CommitStrategy::ScheduleAtPeriodEnd,
        }
    );
}

#[test]
fn lifetime_owner_sees_blocks_and_no_countdown() {
    let mut sub = starter_monthly_snapshot();
    let lifetime = plan("onetime-pro");
    sub.plan_id = lifetime.plan_id.clone();
    sub.plan = Some(lifetime);
    sub.billing_cycle = BillingCycle::OneTime;
    sub.current_period_end = None;

    // Recurring cards are blocked outright.
    let recurring = PlanSelectionHandler::handle(&query(
        Some(sub.clone()),
        "subscription-premium",
        BillingCycle::Yearly,
    ));
    assert_eq!(
        recurring.action,
        SelectionAction::Unavailable(BlockingReason::LifetimeToSubscriptionBlocked)
    );
    assert_eq!(recurring.countdown, None);

    // A higher lifetime tier stays purchasable.
    let higher = PlanSelectionHandler::handle(&query(
        Some(sub.clone()),
        "onetime-premium",
        BillingCycle::OneTime,
    ));
    assert!(higher.availability.available);

    // A lower lifetime tier is blocked as a downgrade.
    let lower = PlanSelectionHandler::handle(&query(
        Some(sub),
        "onetime-starter",
        BillingCycle::OneTime,
    ));
    assert_eq!(
        lower.action,
        SelectionAction::Unavailable(BlockingReason::LifetimeDowngradeBlocked)
    );
}

#[test]
fn reactivation_restores_the_active_view() {
    let mut sub = starter_monthly_snapshot();
    sub.request_cancellation(now(), Some("moving gyms".to_string()))
        .unwrap();
    assert_eq!(sub.effective_status(), SubscriptionStatus::Cancelled);

    // While cancel-at-period-end is set, the countdown still runs against
    // the same period end.
    let view = PlanSelectionHandler::handle(&query(
        Some(sub.clone()),
        "subscription-pro",
        BillingCycle::Monthly,
    ));
    assert!(view.countdown.unwrap().days <= 1);

    sub.reactivate().unwrap();
    assert_eq!(sub.effective_status(), SubscriptionStatus::Active);
    assert!(sub.cancelled_at.is_none());
}

#[test]
fn rollover_applies_the_scheduled_change_and_unblocks_the_target_card() {
    let mut sub = starter_monthly_snapshot();
    sub.schedule_change(
        PlanId::new("subscription-free").unwrap(),
        BillingCycle::Monthly,
        Timestamp::parse_iso("2026-03-02T12:00:00Z").unwrap(),
    )
    .unwrap();

    sub.apply_pending_change(plan("subscription-free")).unwrap();
    assert!(!sub.has_pending_change());

    // The old plan's card is selectable again; the new plan's card is
    // "current".
    let old_card = PlanSelectionHandler::handle(&query(
        Some(sub.clone()),
        "subscription-starter",
        BillingCycle::Monthly,
    ));
    assert!(matches!(old_card.action, SelectionAction::Select { .. }));

    let new_card = PlanSelectionHandler::handle(&query(
        Some(sub),
        "subscription-free",
        BillingCycle::Monthly,
    ));
    assert_eq!(new_card.action, SelectionAction::Current);
}
