//! Summary table types for premstat
//!
//! Pure data structures for the tables derived from premium request events.
//! Field names match the column headers of the CSV outputs, so each type
//! serializes directly into one output row.

use crate::types::{EventTimestamp, ModelName, REFERENCE_MONTH_HOURS, UserId};
use serde::{Deserialize, Serialize};

/// Requests used per model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model: ModelName,
    pub requests_used: u64,
}

/// Requests used per (user, model) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModelSummary {
    pub user: UserId,
    pub model: ModelName,
    pub requests_used: u64,
}

/// Total requests per user together with the resolved monthly quota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user: UserId,
    pub requests_used: u64,
    pub total_monthly_quota: f64,
}

/// Per-user usage projected to a full reference month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedUserSummary {
    pub user: UserId,
    pub estimated_requests_used: u64,
    pub total_monthly_quota: f64,
}

/// A per-user row that pairs usage with a monthly quota
///
/// Implemented by both the actual and the estimated per-user tables so that
/// overage and near-quota logic is written once and applied to either.
pub trait QuotaUsage {
    /// The user the row belongs to
    fn user(&self) -> &UserId;
    /// Requests used (actual or estimated)
    fn requests(&self) -> u64;
    /// Resolved monthly quota
    fn quota(&self) -> f64;
}

impl QuotaUsage for UserSummary {
    fn user(&self) -> &UserId {
        &self.user
    }

    fn requests(&self) -> u64 {
        self.requests_used
    }

    fn quota(&self) -> f64 {
        self.total_monthly_quota
    }
}

impl QuotaUsage for EstimatedUserSummary {
    fn user(&self) -> &UserId {
        &self.user
    }

    fn requests(&self) -> u64 {
        self.estimated_requests_used
    }

    fn quota(&self) -> f64 {
        self.total_monthly_quota
    }
}

/// Time span covered by a dataset
///
/// # Examples
/// ```
/// use premstat_core::summary_types::CoverageWindow;
/// use premstat_core::types::EventTimestamp;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let first = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
/// let window = CoverageWindow::new(
///     EventTimestamp::new(first),
///     EventTimestamp::new(first + Duration::hours(36)),
/// );
/// assert_eq!(window.duration_hours, 36.0);
/// assert_eq!(window.duration_days, 1.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageWindow {
    pub first_timestamp: EventTimestamp,
    pub last_timestamp: EventTimestamp,
    pub duration_hours: f64,
    /// Continuous elapsed days (seconds / 86400)
    pub duration_days: f64,
    /// `duration_hours` as a percentage of the 744-hour reference month
    pub percent_of_reference_month: f64,
}

impl CoverageWindow {
    /// Build a window from its bounds
    pub fn new(first_timestamp: EventTimestamp, last_timestamp: EventTimestamp) -> Self {
        let elapsed = *last_timestamp.inner() - *first_timestamp.inner();
        // Millisecond precision keeps sub-second exports from rounding to zero
        let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
        let duration_hours = seconds / 3600.0;

        Self {
            first_timestamp,
            last_timestamp,
            duration_hours,
            duration_days: seconds / 86_400.0,
            percent_of_reference_month: duration_hours / REFERENCE_MONTH_HOURS * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_coverage_window_ten_days() {
        let first = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let window = CoverageWindow::new(
            EventTimestamp::new(first),
            EventTimestamp::new(first + Duration::days(10)),
        );

        assert_eq!(window.duration_hours, 240.0);
        assert_eq!(window.duration_days, 10.0);
        assert!((window.percent_of_reference_month - 32.258_064_5).abs() < 1e-6);
    }

    #[test]
    fn test_coverage_window_fractional_days_not_double_counted() {
        let first = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let window = CoverageWindow::new(
            EventTimestamp::new(first),
            EventTimestamp::new(first + Duration::days(2) + Duration::hours(12)),
        );

        assert_eq!(window.duration_days, 2.5);
        assert_eq!(window.duration_hours, 60.0);
    }

    #[test]
    fn test_coverage_window_zero_duration() {
        let ts = EventTimestamp::new(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        let window = CoverageWindow::new(ts, ts);

        assert_eq!(window.duration_hours, 0.0);
        assert_eq!(window.duration_days, 0.0);
        assert_eq!(window.percent_of_reference_month, 0.0);
    }

    #[test]
    fn test_summary_serializes_with_column_names() {
        let row = UserSummary {
            user: UserId::new("octocat"),
            requests_used: 12,
            total_monthly_quota: 300.0,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["user"], "octocat");
        assert_eq!(json["requests_used"], 12);
        assert_eq!(json["total_monthly_quota"], 300.0);
    }
}
