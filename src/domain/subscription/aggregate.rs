//! Subscription aggregate entity.
//!
//! The Subscription is the mutable record of a member's or gym manager's
//! current commitment: which plan, on which cycle, in which lifecycle
//! state, and whether a change or cancellation is scheduled for the next
//! period rollover.
//!
//! # Design Decisions
//!
//! - **One pending change**: scheduled changes live in a single
//!   `Option<PendingChange>`, so "at most one at a time" holds by
//!   construction.
//! - **Explicit clock**: every time-dependent query takes `now` as a
//!   parameter; the aggregate never reads the ambient clock.
//! - **Resolved plan is optional**: the catalog lookup may fail for
//!   retired plans; readers treat a missing plan as the no-subscription
//!   case rather than failing.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{BillingCycle, Plan};
use crate::domain::foundation::{
    DomainError, ErrorCode, PlanId, StateMachine, SubscriptionId, Timestamp, UserId,
};

use super::{PendingChange, SubscriptionStatus};

/// End dates further out than this are treated as "no real end" when
/// deciding whether a one-time purchase is a lifetime grant.
const LIFETIME_HORIZON_YEARS: i64 = 50;

/// Trial window metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialMetadata {
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    /// Set once so a member cannot trial twice.
    pub has_used_trial: bool,
    pub converted_to_paid: Option<bool>,
}

/// Subscription aggregate - a member's current commitment.
///
/// # Invariants
///
/// - Status transitions follow the `SubscriptionStatus` state machine
/// - At most one pending change exists at a time
/// - A pending change never targets the currently active plan/cycle pair
///   (scheduling rejects the no-op; readers still tolerate legacy records
///   that violate it)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Unique identifier for this subscription.
    pub id: SubscriptionId,

    /// Member or manager who owns this subscription.
    pub user_id: UserId,

    /// Stable id of the current plan.
    pub plan_id: PlanId,

    /// Resolved catalog entry for the current plan, when available.
    pub plan: Option<Plan>,

    /// Current billing cycle. Records without one are treated as monthly.
    #[serde(default)]
    pub billing_cycle: BillingCycle,

    /// Lifecycle status.
    pub status: SubscriptionStatus,

    /// When the subscription was first created.
    pub start_date: Timestamp,

    /// Hard end of the subscription, if any. One-time purchases either
    /// omit this or set it decades out.
    pub end_date: Option<Timestamp>,

    /// Start of the current billing period.
    pub current_period_start: Timestamp,

    /// End of the current billing period. Absent for lifetime grants.
    pub current_period_end: Option<Timestamp>,

    /// True when the member asked to cancel at period end.
    #[serde(default)]
    pub cancel_at_period_end: bool,

    /// When cancellation was requested.
    pub cancelled_at: Option<Timestamp>,

    /// Free-text reason captured with the cancellation request.
    pub cancellation_reason: Option<String>,

    /// Scheduled future plan/cycle change, if any.
    pub pending_change: Option<PendingChange>,

    /// Trial window metadata, if the subscription started with a trial.
    pub trial: Option<TrialMetadata>,
}

impl Subscription {
    /// Creates an active subscription from a first checkout.
    pub fn create(
        id: SubscriptionId,
        user_id: UserId,
        plan: Plan,
        billing_cycle: BillingCycle,
        period_start: Timestamp,
        period_end: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            user_id,
            plan_id: plan.plan_id.clone(),
            plan: Some(plan),
            billing_cycle,
            status: SubscriptionStatus::Active,
            start_date: period_start,
            end_date: None,
            current_period_start: period_start,
            current_period_end: period_end,
            cancel_at_period_end: false,
            cancelled_at: None,
            cancellation_reason: None,
            pending_change: None,
            trial: None,
        }
    }

    /// Creates a trialing subscription.
    ///
    /// The trial window doubles as the first billing period.
    pub fn create_trialing(
        id: SubscriptionId,
        user_id: UserId,
        plan: Plan,
        billing_cycle: BillingCycle,
        trial_start: Timestamp,
        trial_end: Timestamp,
    ) -> Self {
        let mut subscription = Self::create(
            id,
            user_id,
            plan,
            billing_cycle,
            trial_start,
            Some(trial_end),
        );
        subscription.status = SubscriptionStatus::Trialing;
        subscription.trial = Some(TrialMetadata {
            start_date: trial_start,
            end_date: trial_end,
            has_used_trial: true,
            converted_to_paid: None,
        });
        subscription
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The status the member should see.
    ///
    /// A subscription flagged `cancel_at_period_end` reads as cancelled
    /// even while the stored status is still active.
    pub fn effective_status(&self) -> SubscriptionStatus {
        if self.cancel_at_period_end {
            SubscriptionStatus::Cancelled
        } else {
            self.status
        }
    }

    /// Returns true for one-time (lifetime-type) purchases.
    pub fn is_one_time(&self) -> bool {
        self.billing_cycle == BillingCycle::OneTime
    }

    /// Returns true if this is a lifetime grant: a one-time purchase with
    /// no end date, or one whose end date sits past the 50-year horizon.
    pub fn is_lifetime(&self, now: Timestamp) -> bool {
        if !self.is_one_time() {
            return false;
        }
        match self.end_date {
            None => true,
            Some(end) => end.is_after(&now.add_years(LIFETIME_HORIZON_YEARS)),
        }
    }

    /// Returns true if a change is scheduled for the next rollover.
    pub fn has_pending_change(&self) -> bool {
        self.pending_change.is_some()
    }

    /// Check if this subscription grants access to the application.
    ///
    /// Cancelled subscriptions keep access until the period actually ends;
    /// records without a period end (lifetime) keep it indefinitely.
    pub fn grants_access(&self, now: Timestamp) -> bool {
        match self.effective_status() {
            SubscriptionStatus::Expired => false,
            SubscriptionStatus::Cancelled => self
                .current_period_end
                .map_or(true, |end| !now.is_after(&end)),
            SubscriptionStatus::Active | SubscriptionStatus::Trialing => true,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle mutations
    // ------------------------------------------------------------------

    /// Schedules a plan/cycle change for the next period rollover.
    ///
    /// # Errors
    ///
    /// Rejects a no-op change targeting the current plan/cycle pair, and
    /// scheduling on subscriptions that are expired or already past a
    /// cancellation request.
    pub fn schedule_change(
        &mut self,
        plan_id: PlanId,
        billing_cycle: BillingCycle,
        effective_date: Timestamp,
    ) -> Result<(), DomainError> {
        if plan_id == self.plan_id && billing_cycle == self.billing_cycle {
            return Err(DomainError::validation(
                "pending_change",
                "Scheduled change must differ from the current plan and cycle",
            ));
        }
        match self.effective_status() {
            SubscriptionStatus::Active | SubscriptionStatus::Trialing => {}
            other => {
                return Err(DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    format!("Cannot schedule a change on a {} subscription", other.as_str()),
                ));
            }
        }

        self.pending_change = Some(PendingChange::new(plan_id, billing_cycle, effective_date));
        Ok(())
    }

    /// Cancels the scheduled change, reverting to the active plan/cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if no change is scheduled.
    pub fn cancel_pending_change(&mut self) -> Result<PendingChange, DomainError> {
        self.pending_change.take().ok_or_else(|| {
            DomainError::new(
                ErrorCode::NoPendingChange,
                "No pending change to cancel on this subscription",
            )
        })
    }

    /// Applies the scheduled change at period rollover.
    ///
    /// The caller resolves the target plan from the catalog; the rollover
    /// job is the only expected caller.
    ///
    /// # Errors
    ///
    /// Returns an error if no change is scheduled or the resolved plan
    /// does not match the scheduled target.
    pub fn apply_pending_change(&mut self, target_plan: Plan) -> Result<(), DomainError> {
        let pending = self.pending_change.take().ok_or_else(|| {
            DomainError::new(
                ErrorCode::NoPendingChange,
                "No pending change to apply on this subscription",
            )
        })?;

        if target_plan.plan_id != pending.plan_id {
            // Put the change back; the caller resolved the wrong plan.
            let expected = pending.plan_id.clone();
            self.pending_change = Some(pending);
            return Err(DomainError::validation(
                "plan_id",
                format!(
                    "Resolved plan {} does not match scheduled target {}",
                    target_plan.plan_id, expected
                ),
            ));
        }

        self.plan_id = target_plan.plan_id.clone();
        self.billing_cycle = pending.billing_cycle;
        self.plan = Some(target_plan);
        Ok(())
    }

    /// Records a cancellation request, effective at period end.
    ///
    /// # Errors
    ///
    /// Returns error if the status cannot transition to cancelled.
    pub fn request_cancellation(
        &mut self,
        now: Timestamp,
        reason: Option<String>,
    ) -> Result<(), DomainError> {
        self.transition_status(SubscriptionStatus::Cancelled)?;
        self.cancel_at_period_end = true;
        self.cancelled_at = Some(now);
        self.cancellation_reason = reason;
        Ok(())
    }

    /// Reverses a pending cancellation before the period ends.
    ///
    /// # Errors
    ///
    /// Returns error if no cancellation is pending or the status cannot
    /// transition back to active.
    pub fn reactivate(&mut self) -> Result<(), DomainError> {
        if !self.cancel_at_period_end {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Subscription has no pending cancellation to reverse",
            ));
        }
        self.transition_status(SubscriptionStatus::Active)?;
        self.cancel_at_period_end = false;
        self.cancelled_at = None;
        self.cancellation_reason = None;
        Ok(())
    }

    /// Renews the subscription into a new billing period.
    ///
    /// # Errors
    ///
    /// Returns error if the current status does not allow renewal.
    pub fn renew(
        &mut self,
        period_start: Timestamp,
        period_end: Timestamp,
    ) -> Result<(), DomainError> {
        self.transition_status(SubscriptionStatus::Active)?;
        self.current_period_start = period_start;
        self.current_period_end = Some(period_end);
        self.cancel_at_period_end = false;
        self.cancelled_at = None;
        Ok(())
    }

    /// Marks the subscription expired.
    ///
    /// # Errors
    ///
    /// Returns error if the transition is not allowed.
    pub fn expire(&mut self) -> Result<(), DomainError> {
        self.transition_status(SubscriptionStatus::Expired)?;
        self.cancel_at_period_end = false;
        Ok(())
    }

    /// Transition to a new status using the state machine.
    fn transition_status(&mut self, target: SubscriptionStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition subscription from {:?} to {:?}",
                    self.status, target
                ),
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{PlanCatalog, PlanLevel};

    fn plan(id: &str) -> Plan {
        PlanCatalog::default_catalog()
            .find(&PlanId::new(id).unwrap())
            .unwrap()
            .clone()
    }

    fn now() -> Timestamp {
        Timestamp::parse_iso("2026-03-01T00:00:00Z").unwrap()
    }

    fn period_end() -> Timestamp {
        Timestamp::parse_iso("2026-04-01T00:00:00Z").unwrap()
    }

    fn starter_monthly() -> Subscription {
        Subscription::create(
            SubscriptionId::new(),
            UserId::new("manager-1").unwrap(),
            plan("subscription-starter"),
            BillingCycle::Monthly,
            now(),
            Some(period_end()),
        )
    }

    fn lifetime_pro() -> Subscription {
        let mut sub = Subscription::create(
            SubscriptionId::new(),
            UserId::new("manager-2").unwrap(),
            plan("onetime-pro"),
            BillingCycle::OneTime,
            now(),
            None,
        );
        sub.current_period_end = None;
        sub
    }

    // Construction tests

    #[test]
    fn create_starts_active_on_the_chosen_plan() {
        let sub = starter_monthly();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.plan_id, PlanId::new("subscription-starter").unwrap());
        assert_eq!(sub.billing_cycle, BillingCycle::Monthly);
        assert!(!sub.cancel_at_period_end);
        assert!(sub.pending_change.is_none());
    }

    #[test]
    fn create_trialing_records_trial_window() {
        let sub = Subscription::create_trialing(
            SubscriptionId::new(),
            UserId::new("manager-3").unwrap(),
            plan("subscription-free"),
            BillingCycle::Monthly,
            now(),
            now().add_days(30),
        );
        assert_eq!(sub.status, SubscriptionStatus::Trialing);
        let trial = sub.trial.unwrap();
        assert!(trial.has_used_trial);
        assert_eq!(trial.end_date, now().add_days(30));
    }

    // Query tests

    #[test]
    fn effective_status_reports_cancelled_when_flagged() {
        let mut sub = starter_monthly();
        assert_eq!(sub.effective_status(), SubscriptionStatus::Active);

        sub.request_cancellation(now(), None).unwrap();
        assert_eq!(sub.effective_status(), SubscriptionStatus::Cancelled);
    }

    #[test]
    fn lifetime_requires_one_time_cycle() {
        assert!(!starter_monthly().is_lifetime(now()));
        assert!(lifetime_pro().is_lifetime(now()));
    }

    #[test]
    fn one_time_with_near_end_date_is_not_lifetime() {
        let mut sub = lifetime_pro();
        sub.end_date = Some(now().add_years(5));
        assert!(!sub.is_lifetime(now()));
    }

    #[test]
    fn one_time_with_far_end_date_is_lifetime() {
        let mut sub = lifetime_pro();
        sub.end_date = Some(now().add_years(60));
        assert!(sub.is_lifetime(now()));
    }

    #[test]
    fn active_subscription_grants_access() {
        assert!(starter_monthly().grants_access(now()));
    }

    #[test]
    fn cancelled_subscription_grants_access_until_period_end() {
        let mut sub = starter_monthly();
        sub.request_cancellation(now(), None).unwrap();

        assert!(sub.grants_access(now()));
        assert!(sub.grants_access(period_end()));
        assert!(!sub.grants_access(period_end().add_minutes(1)));
    }

    #[test]
    fn expired_subscription_denies_access() {
        let mut sub = starter_monthly();
        sub.expire().unwrap();
        assert!(!sub.grants_access(now()));
    }

    // Pending change tests

    #[test]
    fn schedule_change_records_target_and_effective_date() {
        let mut sub = starter_monthly();
        sub.schedule_change(
            PlanId::new("subscription-free").unwrap(),
            BillingCycle::Monthly,
            period_end(),
        )
        .unwrap();

        let pending = sub.pending_change.as_ref().unwrap();
        assert!(pending.targets(
            &PlanId::new("subscription-free").unwrap(),
            BillingCycle::Monthly
        ));
        assert_eq!(pending.effective_date, period_end());
    }

    #[test]
    fn schedule_change_rejects_noop_target() {
        let mut sub = starter_monthly();
        let result = sub.schedule_change(
            PlanId::new("subscription-starter").unwrap(),
            BillingCycle::Monthly,
            period_end(),
        );
        assert!(result.is_err());
        assert!(sub.pending_change.is_none());
    }

    #[test]
    fn schedule_change_allows_same_plan_other_cycle() {
        let mut sub = starter_monthly();
        sub.schedule_change(
            PlanId::new("subscription-starter").unwrap(),
            BillingCycle::Yearly,
            period_end(),
        )
        .unwrap();
        assert!(sub.has_pending_change());
    }

    #[test]
    fn schedule_change_replaces_previous_change() {
        let mut sub = starter_monthly();
        sub.schedule_change(
            PlanId::new("subscription-free").unwrap(),
            BillingCycle::Monthly,
            period_end(),
        )
        .unwrap();
        sub.schedule_change(
            PlanId::new("subscription-starter").unwrap(),
            BillingCycle::Yearly,
            period_end(),
        )
        .unwrap();

        let pending = sub.pending_change.as_ref().unwrap();
        assert_eq!(pending.billing_cycle, BillingCycle::Yearly);
    }

    #[test]
    fn schedule_change_rejected_after_expiry() {
        let mut sub = starter_monthly();
        sub.expire().unwrap();
        let result = sub.schedule_change(
            PlanId::new("subscription-free").unwrap(),
            BillingCycle::Monthly,
            period_end(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn cancel_pending_change_clears_and_returns_it() {
        let mut sub = starter_monthly();
        sub.schedule_change(
            PlanId::new("subscription-free").unwrap(),
            BillingCycle::Monthly,
            period_end(),
        )
        .unwrap();

        let cancelled = sub.cancel_pending_change().unwrap();
        assert_eq!(cancelled.plan_id, PlanId::new("subscription-free").unwrap());
        assert!(!sub.has_pending_change());
    }

    #[test]
    fn cancel_pending_change_errors_when_none() {
        let mut sub = starter_monthly();
        let err = sub.cancel_pending_change().unwrap_err();
        assert_eq!(err.code, ErrorCode::NoPendingChange);
    }

    #[test]
    fn apply_pending_change_switches_plan_and_cycle() {
        let mut sub = starter_monthly();
        sub.schedule_change(
            PlanId::new("subscription-free").unwrap(),
            BillingCycle::Monthly,
            period_end(),
        )
        .unwrap();

        sub.apply_pending_change(plan("subscription-free")).unwrap();
        assert_eq!(sub.plan_id, PlanId::new("subscription-free").unwrap());
        assert_eq!(sub.plan.as_ref().unwrap().level, PlanLevel::Free);
        assert!(!sub.has_pending_change());
    }

    #[test]
    fn apply_pending_change_rejects_mismatched_plan() {
        let mut sub = starter_monthly();
        sub.schedule_change(
            PlanId::new("subscription-free").unwrap(),
            BillingCycle::Monthly,
            period_end(),
        )
        .unwrap();

        let result = sub.apply_pending_change(plan("subscription-pro"));
        assert!(result.is_err());
        // The scheduled change survives a bad rollover attempt.
        assert!(sub.has_pending_change());
    }

    // Cancellation lifecycle tests

    #[test]
    fn request_cancellation_sets_flag_and_timestamp() {
        let mut sub = starter_monthly();
        sub.request_cancellation(now(), Some("too expensive".to_string()))
            .unwrap();

        assert!(sub.cancel_at_period_end);
        assert_eq!(sub.cancelled_at, Some(now()));
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
        assert_eq!(sub.cancellation_reason.as_deref(), Some("too expensive"));
    }

    #[test]
    fn reactivate_clears_cancellation_state() {
        let mut sub = starter_monthly();
        sub.request_cancellation(now(), None).unwrap();
        sub.reactivate().unwrap();

        assert!(!sub.cancel_at_period_end);
        assert!(sub.cancelled_at.is_none());
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[test]
    fn reactivate_errors_without_pending_cancellation() {
        let mut sub = starter_monthly();
        assert!(sub.reactivate().is_err());
    }

    #[test]
    fn renew_rolls_the_period_and_clears_cancellation() {
        let mut sub = starter_monthly();
        sub.request_cancellation(now(), None).unwrap();

        let new_start = period_end();
        let new_end = period_end().add_days(30);
        sub.renew(new_start, new_end).unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.current_period_start, new_start);
        assert_eq!(sub.current_period_end, Some(new_end));
        assert!(!sub.cancel_at_period_end);
        assert!(sub.cancelled_at.is_none());
    }

    // Wire format tests

    #[test]
    fn roundtrips_through_json() {
        let mut sub = starter_monthly();
        sub.schedule_change(
            PlanId::new("subscription-free").unwrap(),
            BillingCycle::Monthly,
            period_end(),
        )
        .unwrap();

        let json = serde_json::to_string(&sub).unwrap();
        assert!(json.contains("\"cancelAtPeriodEnd\""));
        assert!(json.contains("\"currentPeriodEnd\""));

        let back: Subscription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sub);
    }

    #[test]
    fn missing_billing_cycle_defaults_to_monthly() {
        let json = r#"{
            "id": "7f1f9dd2-4a87-4f34-9a78-0f6f53f2f111",
            "userId": "manager-9",
            "planId": "subscription-starter",
            "plan": null,
            "status": "active",
            "startDate": "2026-03-01T00:00:00Z",
            "currentPeriodStart": "2026-03-01T00:00:00Z",
            "currentPeriodEnd": "2026-04-01T00:00:00Z",
            "cancelledAt": null,
            "cancellationReason": null,
            "endDate": null,
            "pendingChange": null,
            "trial": null
        }"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.billing_cycle, BillingCycle::Monthly);
        assert!(!sub.cancel_at_period_end);
    }
}
