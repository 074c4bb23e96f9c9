//! Remaining-time projection for the current billing period.
//!
//! Turns a period-end timestamp into the countdown and urgency tier the
//! billing surfaces render. Pure arithmetic; the clock is always an
//! explicit parameter.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Presentation bucket derived from days remaining before period end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Critical,
    High,
    Medium,
    Low,
}

impl UrgencyTier {
    /// Returns the display label for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "critical",
            UrgencyTier::High => "high",
            UrgencyTier::Medium => "medium",
            UrgencyTier::Low => "low",
        }
    }
}

/// Countdown to the end of the current billing period.
///
/// The decomposition floors at every step, so the displayed countdown
/// never overstates the time a member has left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingTimeProjection {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub expired: bool,
}

impl RemainingTimeProjection {
    /// The all-zero, expired projection.
    pub fn expired() -> Self {
        Self {
            days: 0,
            hours: 0,
            minutes: 0,
            expired: true,
        }
    }

    /// Urgency bucket for this countdown.
    ///
    /// Expired is terminal and always renders as critical, regardless of
    /// the numeric fields.
    pub fn urgency(&self) -> UrgencyTier {
        if self.expired {
            return UrgencyTier::Critical;
        }
        match self.days {
            0..=1 => UrgencyTier::Critical,
            2..=3 => UrgencyTier::High,
            4..=7 => UrgencyTier::Medium,
            _ => UrgencyTier::Low,
        }
    }

    /// Compact countdown text, coarsening with distance:
    /// far-out countdowns show days only, the final day shows hours and
    /// minutes, the final hour minutes alone.
    pub fn short_label(&self) -> String {
        if self.expired {
            return "expired".to_string();
        }
        if self.days > 7 {
            format!("{}d", self.days)
        } else if self.days > 0 {
            format!("{}d {}h", self.days, self.hours)
        } else if self.hours > 0 {
            format!("{}h {}m", self.hours, self.minutes)
        } else {
            format!("{}m", self.minutes)
        }
    }
}

/// Projects a period-end timestamp into a countdown.
pub struct RemainingTimeProjector;

impl RemainingTimeProjector {
    /// Computes the countdown from `now` to `period_end`.
    ///
    /// `None` in means `None` out: a record with no period end is a
    /// lifetime/no-end state and the caller renders that instead of a
    /// countdown. Once `now` reaches the period end the projection is the
    /// zeroed, expired value.
    pub fn project(
        period_end: Option<Timestamp>,
        now: Timestamp,
    ) -> Option<RemainingTimeProjection> {
        let period_end = period_end?;
        let diff = period_end.duration_since(&now);
        if diff <= chrono::Duration::zero() {
            return Some(RemainingTimeProjection::expired());
        }

        // Sub-minute remainders floor away: 59s left is 0m, not expired.
        let total_minutes = diff.num_minutes();
        let days = total_minutes / MINUTES_PER_DAY;
        let hours = (total_minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
        let minutes = total_minutes % MINUTES_PER_HOUR;

        Some(RemainingTimeProjection {
            days: days as u64,
            hours: hours as u64,
            minutes: minutes as u64,
            expired: false,
        })
    }

    /// Convenience for callers holding the wire format: parses the
    /// ISO-8601 period end before projecting.
    ///
    /// # Errors
    ///
    /// Fails fast on a malformed timestamp instead of guessing.
    pub fn project_iso(
        period_end_iso: Option<&str>,
        now: Timestamp,
    ) -> Result<Option<RemainingTimeProjection>, ValidationError> {
        let period_end = period_end_iso.map(Timestamp::parse_iso).transpose()?;
        Ok(Self::project(period_end, now))
    }
}
