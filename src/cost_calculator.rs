//! Cost calculator module for computing quota overage and its cost

use crate::error::{PremstatError, Result};
use crate::summary_types::QuotaUsage;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Price of one premium request beyond quota, in USD
pub const DEFAULT_UNIT_COST: f64 = 0.04;

/// Overage of a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOverage {
    pub user: UserId,
    pub requests_used: u64,
    pub total_monthly_quota: f64,
    /// Requests beyond quota; never negative
    pub overage: f64,
}

/// Overage across all users
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverageSummary {
    pub users: Vec<UserOverage>,
    pub sum_overage: f64,
    pub cost_overage: f64,
    pub unit_cost: f64,
}

impl OverageSummary {
    /// Users that exceed their quota
    pub fn over_quota(&self) -> impl Iterator<Item = &UserOverage> {
        self.users.iter().filter(|u| u.overage > 0.0)
    }
}

/// Calculates overage and its cost at a fixed per-request rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostCalculator {
    unit_cost: f64,
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self {
            unit_cost: DEFAULT_UNIT_COST,
        }
    }
}

impl CostCalculator {
    /// Create a calculator charging `unit_cost` USD per request over quota
    ///
    /// # Errors
    ///
    /// Returns an error if `unit_cost` is negative or not finite
    pub fn new(unit_cost: f64) -> Result<Self> {
        if !unit_cost.is_finite() || unit_cost < 0.0 {
            return Err(PremstatError::InvalidArgument(format!(
                "unit cost must be a non-negative number, got {unit_cost}"
            )));
        }
        Ok(Self { unit_cost })
    }

    /// Price of one request beyond quota
    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    /// Requests beyond quota for one user, clamped at zero
    pub fn overage(requests_used: u64, quota: f64) -> f64 {
        (requests_used as f64 - quota).max(0.0)
    }

    /// Cost of a number of requests beyond quota
    pub fn cost_of(&self, overage: f64) -> f64 {
        overage * self.unit_cost
    }

    /// Overage for every row of an actual or estimated per-user table
    pub fn calculate_for<T: QuotaUsage>(&self, rows: &[T]) -> OverageSummary {
        let users: Vec<UserOverage> = rows
            .iter()
            .map(|row| UserOverage {
                user: row.user().clone(),
                requests_used: row.requests(),
                total_monthly_quota: row.quota(),
                overage: Self::overage(row.requests(), row.quota()),
            })
            .collect();
        let sum_overage: f64 = users.iter().map(|u| u.overage).sum();
        let cost_overage = self.cost_of(sum_overage);

        debug!(
            "Calculated overage: {} requests over quota, ${:.2} at ${}/request",
            sum_overage, cost_overage, self.unit_cost
        );

        OverageSummary {
            users,
            sum_overage,
            cost_overage,
            unit_cost: self.unit_cost,
        }
    }
}
