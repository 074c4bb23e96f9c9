//! Per-currency, per-cycle plan pricing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::BillingCycle;

/// Currencies the catalog prices plans in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SupportedCurrency {
    Eur,
    Usd,
    Dzd,
}

impl SupportedCurrency {
    /// Returns the ISO-4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            SupportedCurrency::Eur => "EUR",
            SupportedCurrency::Usd => "USD",
            SupportedCurrency::Dzd => "DZD",
        }
    }
}

impl fmt::Display for SupportedCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Prices for one currency across the billing cycles a plan supports.
///
/// Subscription plans carry `monthly`/`yearly`; one-time plans carry only
/// `one_time`. Absent entries mean the plan is not sold on that cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclePricing {
    pub monthly: Option<u64>,
    pub yearly: Option<u64>,
    pub one_time: Option<u64>,
}

impl CyclePricing {
    /// Returns the price for a cycle, if the plan is sold on it.
    pub fn for_cycle(&self, cycle: BillingCycle) -> Option<u64> {
        match cycle {
            BillingCycle::Monthly => self.monthly,
            BillingCycle::Yearly => self.yearly,
            BillingCycle::OneTime => self.one_time,
        }
    }
}

/// Per-currency pricing table for a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanPricing(HashMap<SupportedCurrency, CyclePricing>);

impl PlanPricing {
    /// Creates a pricing table from explicit entries.
    pub fn new(entries: HashMap<SupportedCurrency, CyclePricing>) -> Self {
        Self(entries)
    }

    /// Returns the price of the plan in a currency for a cycle.
    pub fn price(&self, currency: SupportedCurrency, cycle: BillingCycle) -> Option<u64> {
        self.0.get(&currency).and_then(|p| p.for_cycle(cycle))
    }

    /// Amount saved per year by paying yearly instead of monthly.
    ///
    /// Only meaningful when both prices exist and yearly is actually
    /// cheaper than twelve monthly payments; returns `None` otherwise.
    pub fn yearly_savings(&self, currency: SupportedCurrency) -> Option<u64> {
        let pricing = self.0.get(&currency)?;
        let monthly = pricing.monthly?;
        let yearly = pricing.yearly?;
        let full_year = monthly.checked_mul(12)?;
        if full_year > yearly {
            Some(full_year - yearly)
        } else {
            None
        }
    }

    /// Returns true if no currency has any price.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
