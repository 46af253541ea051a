//! Filtering module for per-user quota tables
//!
//! Both filters work on any table implementing [`QuotaUsage`], so the same
//! logic serves the actual and the estimated per-user tables.
//!
//! # Examples
//!
//! ```
//! use premstat::filters::QuotaThresholdFilter;
//! use premstat::summary_types::UserSummary;
//! use premstat::types::UserId;
//!
//! let users = vec![
//!     UserSummary { user: UserId::new("alice"), requests_used: 290, total_monthly_quota: 300.0 },
//!     UserSummary { user: UserId::new("bob"), requests_used: 100, total_monthly_quota: 300.0 },
//! ];
//!
//! let near = QuotaThresholdFilter::new(90.0).unwrap().apply(&users);
//! assert_eq!(near.len(), 1);
//! assert_eq!(near[0].user.as_str(), "alice");
//! ```

use crate::error::{PremstatError, Result};
use crate::summary_types::QuotaUsage;
use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// Default near-quota threshold, in percent
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 90.0;

/// Monthly quota of the base plan
pub const DEFAULT_PLAN_QUOTA: f64 = 300.0;

/// Usage at which the higher plan becomes cheaper than paying overage
pub const DEFAULT_UPGRADE_MIN_REQUESTS: u64 = 800;

/// A user at or above the near-quota threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearQuotaUser {
    pub user: UserId,
    pub requests_used: u64,
    pub total_monthly_quota: f64,
    /// Usage as a percentage of quota
    pub percent_of_quota: f64,
}

/// A base-plan user whose usage justifies an upgrade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeCandidate {
    pub user: UserId,
    pub requests_used: u64,
    pub total_monthly_quota: f64,
}

/// Usage as a percentage of quota
///
/// A zero quota with any usage is infinitely over; zero usage is 0%.
pub fn percent_of_quota(requests_used: u64, quota: f64) -> f64 {
    if quota > 0.0 {
        requests_used as f64 * 100.0 / quota
    } else if requests_used > 0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Keeps users at or above a percentage of their quota
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaThresholdFilter {
    threshold_percent: f64,
}

impl Default for QuotaThresholdFilter {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
        }
    }
}

impl QuotaThresholdFilter {
    /// Create a filter for `threshold_percent` (0 to 100)
    pub fn new(threshold_percent: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&threshold_percent) {
            return Err(PremstatError::InvalidArgument(format!(
                "threshold must be between 0 and 100, got {threshold_percent}"
            )));
        }
        Ok(Self { threshold_percent })
    }

    /// The configured threshold, in percent
    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    /// Check if a row passes the filter
    pub fn matches<T: QuotaUsage>(&self, row: &T) -> bool {
        percent_of_quota(row.requests(), row.quota()) >= self.threshold_percent
    }

    /// Rows at or above the threshold, in input order
    pub fn apply<T: QuotaUsage>(&self, rows: &[T]) -> Vec<NearQuotaUser> {
        rows.iter()
            .filter(|row| self.matches(*row))
            .map(|row| NearQuotaUser {
                user: row.user().clone(),
                requests_used: row.requests(),
                total_monthly_quota: row.quota(),
                percent_of_quota: percent_of_quota(row.requests(), row.quota()),
            })
            .collect()
    }
}

/// Keeps base-plan users whose usage reaches the upgrade break-even point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeCandidateFilter {
    /// Quota that identifies the base plan
    pub plan_quota: f64,
    /// Minimum usage to be a candidate
    pub min_requests: u64,
}

impl Default for UpgradeCandidateFilter {
    fn default() -> Self {
        Self {
            plan_quota: DEFAULT_PLAN_QUOTA,
            min_requests: DEFAULT_UPGRADE_MIN_REQUESTS,
        }
    }
}

impl UpgradeCandidateFilter {
    /// Create a new filter
    pub fn new(plan_quota: f64, min_requests: u64) -> Self {
        Self {
            plan_quota,
            min_requests,
        }
    }

    /// Check if a row passes the filter
    pub fn matches<T: QuotaUsage>(&self, row: &T) -> bool {
        (row.quota() - self.plan_quota).abs() < f64::EPSILON && row.requests() >= self.min_requests
    }

    /// Matching rows, in input order
    pub fn apply<T: QuotaUsage>(&self, rows: &[T]) -> Vec<UpgradeCandidate> {
        rows.iter()
            .filter(|row| self.matches(*row))
            .map(|row| UpgradeCandidate {
                user: row.user().clone(),
                requests_used: row.requests(),
                total_monthly_quota: row.quota(),
            })
            .collect()
    }
}
