//! Full usage report
//!
//! Runs the pipeline stages in order over one event set:
//! aggregation, quota resolution, coverage estimation and overage.
//! Each stage is a pure function of the previous stage's output, so
//! building a report twice from the same events yields the same report.

use crate::aggregation::Aggregator;
use crate::cost_calculator::{CostCalculator, OverageSummary};
use crate::coverage::{CoverageEstimator, ScalingDecision, coverage_window};
use crate::quota::QuotaResolver;
use crate::summary_types::{
    CoverageWindow, EstimatedUserSummary, ModelSummary, UserModelSummary, UserSummary,
};
use crate::types::{PremiumRequest, UserId};
use serde::Serialize;
use tracing::{info, warn};

/// Everything derived from one event set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageReport {
    /// Number of events the report was built from
    pub total_events: usize,
    /// Time span of the events; `None` when there are none
    pub coverage: Option<CoverageWindow>,
    pub scaling: ScalingDecision,
    pub per_model: Vec<ModelSummary>,
    pub per_user_model: Vec<UserModelSummary>,
    /// Users with a resolved quota, by `requests_used` descending
    pub per_user: Vec<UserSummary>,
    /// Users with a resolved quota, by `estimated_requests_used` descending
    pub estimated: Vec<EstimatedUserSummary>,
    /// Overage of the estimated table
    pub overage: OverageSummary,
    /// Users dropped for lack of a resolvable quota
    pub unresolved_quota_users: Vec<UserId>,
}

impl UsageReport {
    /// Build a report from normalized events
    ///
    /// With no events every table is empty, the scaling decision is
    /// [`ScalingDecision::ZeroDuration`] and there is no coverage window.
    pub fn build(events: &[PremiumRequest], calculator: &CostCalculator) -> Self {
        let coverage = coverage_window(events);

        let tables = Aggregator::summarize(events);
        let resolution = QuotaResolver::resolve(events, &tables.per_user);

        let scaling = coverage
            .as_ref()
            .map_or(ScalingDecision::ZeroDuration, CoverageEstimator::decide);
        let estimated = CoverageEstimator::estimate(&resolution.users, scaling);
        let overage = calculator.calculate_for(&estimated);

        match &coverage {
            Some(window) => info!(
                "Report covers {:.2} days; {}; estimated overage {} requests (${:.2})",
                window.duration_days, scaling, overage.sum_overage, overage.cost_overage
            ),
            None => warn!("No usage events left after excluding unlimited-quota rows"),
        }

        Self {
            total_events: events.len(),
            coverage,
            scaling,
            per_model: tables.per_model,
            per_user_model: tables.per_user_model,
            per_user: resolution.users,
            estimated,
            overage,
            unresolved_quota_users: resolution.unresolved_users,
        }
    }

    /// Overage of the actual, unscaled per-user table
    pub fn actual_overage(&self, calculator: &CostCalculator) -> OverageSummary {
        calculator.calculate_for(&self.per_user)
    }
}
