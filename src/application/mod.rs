//! Application layer - query handlers over the domain services.
//!
//! Thin, synchronous composition of the domain decision services into the
//! views the billing surfaces consume.

mod plan_selection;

pub use plan_selection::{
    PlanSelectionHandler, PlanSelectionQuery, PlanSelectionView, SelectionAction,
};
