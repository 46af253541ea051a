//! Coverage estimation
//!
//! Measures how much time a dataset spans and, when that is less than a full
//! month, projects per-user usage onto the 744-hour reference month.
//!
//! # Examples
//!
//! ```
//! use premstat::coverage::{CoverageEstimator, ScalingDecision};
//! use premstat::summary_types::{CoverageWindow, UserSummary};
//! use premstat::types::{EventTimestamp, UserId};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let first = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
//! let window = CoverageWindow::new(
//!     EventTimestamp::new(first),
//!     EventTimestamp::new(first + Duration::days(10)),
//! );
//!
//! let decision = CoverageEstimator::decide(&window);
//! assert!(matches!(decision, ScalingDecision::Scaled { .. }));
//!
//! let users = vec![UserSummary {
//!     user: UserId::new("alice"),
//!     requests_used: 100,
//!     total_monthly_quota: 300.0,
//! }];
//! let estimated = CoverageEstimator::estimate(&users, decision);
//! assert_eq!(estimated[0].estimated_requests_used, 310);
//! ```

use crate::summary_types::{CoverageWindow, EstimatedUserSummary, UserSummary};
use crate::types::{FULL_MONTH_DAYS, PremiumRequest, REFERENCE_MONTH_HOURS};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// How observed counts are turned into monthly estimates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalingDecision {
    /// The data already covers a full month; counts are used as-is
    FullMonth,
    /// Counts are multiplied by `factor` (reference hours / observed hours)
    Scaled { factor: f64 },
    /// All events share one instant; nothing can be projected and every estimate is 0
    ZeroDuration,
}

impl ScalingDecision {
    /// Multiplier applied to observed counts
    pub fn factor(&self) -> f64 {
        match self {
            Self::FullMonth => 1.0,
            Self::Scaled { factor } => *factor,
            Self::ZeroDuration => 0.0,
        }
    }

    /// Project one observed count, rounding halves to even
    pub fn apply(&self, requests_used: u64) -> u64 {
        match self {
            Self::FullMonth => requests_used,
            Self::Scaled { factor } => (requests_used as f64 * factor).round_ties_even() as u64,
            Self::ZeroDuration => 0,
        }
    }
}

impl fmt::Display for ScalingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullMonth => write!(f, "full month of data, no scaling applied"),
            Self::Scaled { factor } => write!(f, "partial month, scaled by {factor:.4}"),
            Self::ZeroDuration => write!(f, "zero-length time span, estimates set to 0"),
        }
    }
}

/// Span between the earliest and latest event, or `None` for no events
pub fn coverage_window(events: &[PremiumRequest]) -> Option<CoverageWindow> {
    let first = events.iter().map(|e| e.timestamp).min()?;
    let last = events.iter().map(|e| e.timestamp).max()?;
    let window = CoverageWindow::new(first, last);
    debug!(
        "Coverage window {} .. {} ({:.2} hours)",
        window.first_timestamp, window.last_timestamp, window.duration_hours
    );
    Some(window)
}

/// Projects per-user usage to a full reference month
pub struct CoverageEstimator;

impl CoverageEstimator {
    /// Decide whether and how to scale for a given window
    pub fn decide(window: &CoverageWindow) -> ScalingDecision {
        if window.duration_days >= FULL_MONTH_DAYS {
            ScalingDecision::FullMonth
        } else if window.duration_hours > 0.0 {
            ScalingDecision::Scaled {
                factor: REFERENCE_MONTH_HOURS / window.duration_hours,
            }
        } else {
            ScalingDecision::ZeroDuration
        }
    }

    /// Estimated monthly usage per user, sorted by estimate descending
    pub fn estimate(users: &[UserSummary], decision: ScalingDecision) -> Vec<EstimatedUserSummary> {
        let mut estimated: Vec<EstimatedUserSummary> = users
            .iter()
            .map(|user| EstimatedUserSummary {
                user: user.user.clone(),
                estimated_requests_used: decision.apply(user.requests_used),
                total_monthly_quota: user.total_monthly_quota,
            })
            .collect();
        estimated.sort_by(|a, b| b.estimated_requests_used.cmp(&a.estimated_requests_used));
        estimated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventTimestamp, ModelName, QuotaValue, UserId};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn window(span: Duration) -> CoverageWindow {
        CoverageWindow::new(EventTimestamp::new(base()), EventTimestamp::new(base() + span))
    }

    fn user(name: &str, requests_used: u64) -> UserSummary {
        UserSummary {
            user: UserId::new(name),
            requests_used,
            total_monthly_quota: 300.0,
        }
    }

    #[test]
    fn test_window_from_events() {
        let event = |ts| PremiumRequest {
            user: UserId::new("alice"),
            model: ModelName::new("o3"),
            timestamp: EventTimestamp::new(ts),
            quota: QuotaValue::Limited(300.0),
        };
        let events = vec![
            event(base() + Duration::hours(5)),
            event(base()),
            event(base() + Duration::hours(48)),
        ];

        let window = coverage_window(&events).unwrap();
        assert_eq!(*window.first_timestamp.inner(), base());
        assert_eq!(*window.last_timestamp.inner(), base() + Duration::hours(48));
        assert_eq!(window.duration_days, 2.0);
        assert!(coverage_window(&[]).is_none());
    }

    #[test]
    fn test_exactly_thirty_days_is_full_month() {
        let decision = CoverageEstimator::decide(&window(Duration::days(30)));
        assert_eq!(decision, ScalingDecision::FullMonth);

        let estimated = CoverageEstimator::estimate(&[user("alice", 123)], decision);
        assert_eq!(estimated[0].estimated_requests_used, 123);
    }

    #[test]
    fn test_just_under_thirty_days_is_scaled() {
        let decision = CoverageEstimator::decide(&window(Duration::days(30) - Duration::seconds(1)));
        assert!(matches!(decision, ScalingDecision::Scaled { .. }));
    }

    #[test]
    fn test_ten_days_scales_to_reference_month() {
        let decision = CoverageEstimator::decide(&window(Duration::days(10)));
        assert_eq!(decision.factor(), 744.0 / 240.0);

        let estimated = CoverageEstimator::estimate(&[user("alice", 100)], decision);
        assert_eq!(estimated[0].estimated_requests_used, 310);
        assert_eq!(estimated[0].total_monthly_quota, 300.0);
    }

    #[test]
    fn test_rounding_half_to_even() {
        // 744 / 48 = 15.5
        let decision = CoverageEstimator::decide(&window(Duration::hours(48)));
        assert_eq!(decision.apply(1), 16);
        assert_eq!(decision.apply(3), 46);
        assert_eq!(decision.apply(2), 31);
    }

    #[test]
    fn test_zero_duration_estimates_zero() {
        let decision = CoverageEstimator::decide(&window(Duration::zero()));
        assert_eq!(decision, ScalingDecision::ZeroDuration);

        let estimated = CoverageEstimator::estimate(&[user("alice", 5), user("bob", 2)], decision);
        assert!(estimated.iter().all(|u| u.estimated_requests_used == 0));
    }

    #[test]
    fn test_estimates_sorted_descending() {
        let decision = CoverageEstimator::decide(&window(Duration::days(10)));
        let estimated = CoverageEstimator::estimate(
            &[user("amy", 1), user("bob", 50), user("cat", 10)],
            decision,
        );
        let order: Vec<&str> = estimated.iter().map(|u| u.user.as_str()).collect();
        assert_eq!(order, vec!["bob", "cat", "amy"]);
    }
}
