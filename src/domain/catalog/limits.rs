//! Resource limits attached to a plan.

use serde::{Deserialize, Serialize};

/// Resource ceilings for a plan. `None` = unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    /// Maximum gyms the account may manage.
    pub max_gyms: Option<u32>,
    /// Maximum members per gym.
    pub max_members: Option<u32>,
    /// Gem allowance for premium in-app actions.
    pub max_gems: Option<u32>,
}

impl PlanLimits {
    /// Check if the gym limit has been reached.
    ///
    /// Returns false if unlimited or under limit.
    pub fn gym_limit_reached(&self, current_gyms: u32) -> bool {
        self.max_gyms.map(|max| current_gyms >= max).unwrap_or(false)
    }

    /// Check if the member limit has been reached.
    ///
    /// Returns false if unlimited or under limit.
    pub fn member_limit_reached(&self, current_members: u32) -> bool {
        self.max_members
            .map(|max| current_members >= max)
            .unwrap_or(false)
    }
}
