//! Seeded plan catalog.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, PlanId};

use super::Plan;

/// The default catalog shipped with the engine, seeded from the same data
/// the platform publishes.
static DEFAULT_CATALOG: Lazy<PlanCatalog> = Lazy::new(|| {
    PlanCatalog::from_yaml(include_str!("default_plans.yaml"))
        .expect("embedded default catalog must parse")
});

/// Immutable collection of the plans currently on sale.
///
/// Seeded once from catalog data; the engine resolves plan references
/// against it but never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

impl PlanCatalog {
    /// Builds a catalog from explicit plans, rejecting duplicate ids.
    pub fn from_plans(plans: Vec<Plan>) -> Result<Self, DomainError> {
        for (i, plan) in plans.iter().enumerate() {
            if plans[..i].iter().any(|p| p.plan_id == plan.plan_id) {
                return Err(DomainError::new(
                    ErrorCode::CatalogSeedFailed,
                    format!("Duplicate plan id in catalog: {}", plan.plan_id),
                ));
            }
        }
        Ok(Self { plans })
    }

    /// Parses a catalog from YAML seed data.
    pub fn from_yaml(yaml: &str) -> Result<Self, DomainError> {
        let parsed: PlanCatalog = serde_yaml::from_str(yaml).map_err(|e| {
            DomainError::new(
                ErrorCode::CatalogSeedFailed,
                format!("Catalog seed did not parse: {}", e),
            )
        })?;
        Self::from_plans(parsed.plans)
    }

    /// The catalog shipped with the engine.
    pub fn default_catalog() -> &'static PlanCatalog {
        &DEFAULT_CATALOG
    }

    /// Looks up a plan by its stable id.
    pub fn find(&self, id: &PlanId) -> Option<&Plan> {
        self.plans.iter().find(|p| &p.plan_id == id)
    }

    /// All plans, in seed order.
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    /// Plans sorted for display: by `order`, unordered entries last.
    pub fn sorted_for_display(&self) -> Vec<&Plan> {
        let mut sorted: Vec<&Plan> = self.plans.iter().collect();
        sorted.sort_by_key(|p| p.order.unwrap_or(u32::MAX));
        sorted
    }

    /// Number of plans in the catalog.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Returns true if the catalog holds no plans.
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
