//! Integration tests for the premstat pipeline stages

mod common;

use common::{RequestBuilder, hourly_requests, month_start, ten_day_rows};
use premstat::{
    aggregation::Aggregator,
    cost_calculator::CostCalculator,
    coverage::{CoverageEstimator, ScalingDecision, coverage_window},
    quota::QuotaResolver,
    report::UsageReport,
    timezone::TimezoneConfig,
    types::{PremiumRequest, UserId},
};

fn build(rows: Vec<RequestBuilder>) -> Vec<PremiumRequest> {
    rows.into_iter().map(RequestBuilder::build).collect()
}

#[test]
fn test_per_model_counts_sum_to_event_count() {
    let mut rows = hourly_requests("alice", "gpt-4.1", 40, "300");
    rows.extend(hourly_requests("bob", "o3", 25, "300"));
    rows.extend(hourly_requests("carol", "gpt-4.1", 7, "Unlimited-ish"));
    let events = build(rows);

    let per_model = Aggregator::requests_per_model(&events);
    let total: u64 = per_model.iter().map(|m| m.requests_used).sum();
    assert_eq!(total, events.len() as u64);
}

#[test]
fn test_user_totals_match_user_model_rows() {
    let mut rows = hourly_requests("alice", "gpt-4.1", 12, "300");
    rows.extend(hourly_requests("alice", "o3", 8, "300"));
    rows.extend(hourly_requests("bob", "o3", 5, "300"));
    let events = build(rows);

    let tables = Aggregator::summarize(&events);
    for total in &tables.per_user {
        let sum: u64 = tables
            .per_user_model
            .iter()
            .filter(|row| row.user == total.user)
            .map(|row| row.requests_used)
            .sum();
        assert_eq!(sum, total.requests_used);
    }
    assert_eq!(tables.per_user[0].user.as_str(), "alice");
    assert_eq!(tables.per_user[0].requests_used, 20);
}

#[test]
fn test_quota_resolves_to_maximum() {
    let events = build(vec![
        RequestBuilder::new().with_quota("300"),
        RequestBuilder::new().with_quota("300").with_hours_offset(1),
        RequestBuilder::new().with_quota("450").with_hours_offset(2),
    ]);

    let quotas = QuotaResolver::resolve_quotas(&events);
    assert_eq!(quotas.get(&UserId::new("alice")), Some(&450.0));
}

#[test]
fn test_exactly_thirty_days_is_full_month() {
    let events = build(vec![
        RequestBuilder::new().with_hours_offset(0),
        RequestBuilder::new().with_hours_offset(30 * 24),
    ]);
    let window = coverage_window(&events).unwrap();

    assert_eq!(window.duration_days, 30.0);
    assert_eq!(CoverageEstimator::decide(&window), ScalingDecision::FullMonth);
}

#[test]
fn test_ten_day_window_scales_to_month() {
    let report = UsageReport::build(&build(ten_day_rows()), &CostCalculator::default());

    assert_eq!(report.coverage.as_ref().unwrap().duration_hours, 240.0);
    let alice = report
        .estimated
        .iter()
        .find(|u| u.user.as_str() == "alice")
        .unwrap();
    assert_eq!(alice.estimated_requests_used, 310);
    assert_eq!(report.overage.sum_overage, 10.0);
    assert_eq!(format!("{:.2}", report.overage.cost_overage), "0.40");
}

#[test]
fn test_overage_examples() {
    assert_eq!(CostCalculator::overage(310, 300.0), 10.0);
    assert_eq!(CostCalculator::overage(250, 300.0), 0.0);
    assert_eq!(
        format!("{:.2}", CostCalculator::default().cost_of(1000.0)),
        "40.00"
    );
}

#[test]
fn test_zero_duration_report() {
    let events = build(vec![
        RequestBuilder::new(),
        RequestBuilder::new().with_user("bob"),
    ]);
    let report = UsageReport::build(&events, &CostCalculator::default());

    assert_eq!(report.scaling, ScalingDecision::ZeroDuration);
    assert!(report.estimated.iter().all(|u| u.estimated_requests_used == 0));
    assert_eq!(report.overage.sum_overage, 0.0);
}

#[test]
fn test_report_is_deterministic() {
    let events = build(ten_day_rows());
    let first = UsageReport::build(&events, &CostCalculator::default());
    let second = UsageReport::build(&events, &CostCalculator::default());
    assert_eq!(first, second);
}

#[test]
fn test_daily_series_in_timezone() {
    let events = build(vec![
        RequestBuilder::new().with_timestamp(month_start() + chrono::Duration::hours(20)),
        RequestBuilder::new().with_timestamp(month_start() + chrono::Duration::hours(2)),
    ]);

    let utc = Aggregator::new(TimezoneConfig::default()).requests_per_day(&events);
    assert_eq!(utc.len(), 1);
    assert_eq!(utc[0].total_requests, 2);

    let tokyo = TimezoneConfig::from_cli(Some("Asia/Tokyo"), false).unwrap();
    let days = Aggregator::new(tokyo).requests_per_day(&events);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date.to_string(), "2025-06-01");
    assert_eq!(days[1].date.to_string(), "2025-06-02");
}
