//! Decision module - Pure domain services for plan selection.
//!
//! The three side-effect-free units the billing surfaces are built on:
//!
//! - `transition` - classifies a requested plan/cycle change
//! - `availability` - decides whether a candidate selection is allowed
//! - `remaining_time` - projects the countdown to period end
//!
//! All three are deterministic functions of their declared inputs. They
//! read no ambient state, so they are safe to call from any number of
//! rendering contexts at once, and must always be fed the freshest
//! subscription snapshot - decisions are never cached across a mutation.

mod availability;
mod remaining_time;
mod transition;

pub use availability::{AvailabilityDecision, AvailabilityEvaluator, BlockingReason};
pub use remaining_time::{RemainingTimeProjection, RemainingTimeProjector, UrgencyTier};
pub use transition::{CommitStrategy, TransitionClass, TransitionClassifier};
