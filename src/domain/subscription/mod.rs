//! Subscription domain module.
//!
//! The mutable side of the billing domain: a member's current commitment,
//! its lifecycle status, and any change scheduled for the next rollover.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription aggregate entity
//! - `status` - SubscriptionStatus state machine
//! - `pending_change` - Scheduled future plan/cycle change
//! - `history` - Audit action vocabulary

mod aggregate;
mod history;
mod pending_change;
mod status;

pub use aggregate::{Subscription, TrialMetadata};
pub use history::HistoryAction;
pub use pending_change::PendingChange;
pub use status::SubscriptionStatus;
