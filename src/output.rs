//! Output formatting module for premstat
//!
//! This module provides formatters for displaying report data in different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```no_run
//! use premstat::cost_calculator::CostCalculator;
//! use premstat::data_loader::DataLoader;
//! use premstat::output::get_formatter;
//! use premstat::report::UsageReport;
//!
//! # fn example() -> premstat::Result<()> {
//! let loaded = DataLoader::new().load_file("premium_requests.csv")?;
//! let report = UsageReport::build(&loaded.events, &CostCalculator::default());
//!
//! // Human-readable summary
//! println!("{}", get_formatter(false).format_report(&report));
//!
//! // Machine-readable summary
//! println!("{}", get_formatter(true).format_report(&report));
//! # Ok(())
//! # }
//! ```

use crate::aggregation::DailyRequests;
use crate::filters::{NearQuotaUser, UpgradeCandidate};
use crate::report::UsageReport;
use crate::types::REFERENCE_MONTH_HOURS;
use colored::Colorize;
use prettytable::{Table, format, row};
use serde_json::json;

/// Trait for output formatters
///
/// Implementations can provide different output formats (table, JSON, ...).
pub trait OutputFormatter {
    /// Format the full usage report
    fn format_report(&self, report: &UsageReport) -> String;

    /// Format users at or above a percentage of their quota
    fn format_near_quota(&self, data: &[NearQuotaUser], threshold_percent: f64, estimated: bool)
    -> String;

    /// Format base-plan users who would benefit from an upgrade
    fn format_upgrade_candidates(&self, data: &[UpgradeCandidate], estimated: bool) -> String;

    /// Format the requests-per-day series
    fn format_daily(&self, data: &[DailyRequests]) -> String;
}

/// Table formatter for human-readable output
///
/// Produces ASCII tables suitable for terminal display. Numbers are
/// formatted with thousands separators and costs with dollar signs.
pub struct TableFormatter;

impl TableFormatter {
    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    /// Format a quota or overage, dropping a zero fraction
    fn format_amount(value: f64) -> String {
        if value.fract() == 0.0 && value >= 0.0 && value < u64::MAX as f64 {
            Self::format_number(value as u64)
        } else {
            format!("{value:.1}")
        }
    }

    /// Format currency with dollar sign
    fn format_currency(amount: f64) -> String {
        format!("${amount:.2}")
    }

    fn format_percent(percent: f64) -> String {
        if percent.is_finite() {
            format!("{percent:.1}%")
        } else {
            "no quota".to_string()
        }
    }

    fn section(title: &str) -> String {
        format!("\n{}\n", format!("--- {title} ---").bold())
    }

    fn new_table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table
    }

    fn label(estimated: bool) -> &'static str {
        if estimated { "Estimated" } else { "Actual" }
    }
}

impl OutputFormatter for TableFormatter {
    fn format_report(&self, report: &UsageReport) -> String {
        let mut output = Self::section("Data Summary");

        match &report.coverage {
            Some(coverage) => {
                output.push_str(&format!("First timestamp: {}\n", coverage.first_timestamp));
                output.push_str(&format!("Last timestamp: {}\n", coverage.last_timestamp));
                output.push_str(&format!(
                    "Duration: {:.2} hours ({:.2} days)\n",
                    coverage.duration_hours, coverage.duration_days
                ));
                output.push_str(&format!(
                    "Average hours in a 31-day month: {REFERENCE_MONTH_HOURS} hours\n"
                ));
                output.push_str(&format!(
                    "Percent of full 31-day month: {:.2}%\n",
                    coverage.percent_of_reference_month
                ));
            }
            None => {
                output.push_str(&format!(
                    "{}\n",
                    "No time window: no usage events after excluding unlimited-quota rows"
                        .yellow()
                ));
            }
        }
        output.push_str(&format!("Monthly estimate: {}\n", report.scaling));

        output.push_str(&Self::section("Requests per Model"));
        let mut table = Self::new_table();
        table.set_titles(row![b -> "Model", b -> "Requests Used"]);
        for model in &report.per_model {
            table.add_row(row![model.model, r -> Self::format_number(model.requests_used)]);
        }
        output.push_str(&table.to_string());

        if !report.unresolved_quota_users.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                format!(
                    "{} users without a numeric monthly quota are not included in per-user tables",
                    report.unresolved_quota_users.len()
                )
                .yellow()
            ));
        }

        output.push_str(&Self::section("Estimated Overage (Based on Premium Requests)"));
        let over_quota: Vec<_> = report.overage.over_quota().collect();
        if !over_quota.is_empty() {
            let mut table = Self::new_table();
            table.set_titles(row![
                b -> "User",
                b -> "Estimated Requests",
                b -> "Monthly Quota",
                b -> "Overage"
            ]);
            for user in over_quota {
                table.add_row(row![
                    user.user,
                    r -> Self::format_number(user.requests_used),
                    r -> Self::format_amount(user.total_monthly_quota),
                    r -> Self::format_amount(user.overage)
                ]);
            }
            output.push_str(&table.to_string());
        }

        let sum_line = format!(
            "Sum of estimated monthly premium request overage: {}",
            Self::format_amount(report.overage.sum_overage)
        );
        let cost_line = format!(
            "Estimated monthly overage cost: {}",
            Self::format_currency(report.overage.cost_overage)
        );
        if report.overage.sum_overage > 0.0 {
            output.push_str(&format!("{}\n{}\n", sum_line.red(), cost_line.red().bold()));
        } else {
            output.push_str(&format!("{sum_line}\n{cost_line}\n"));
        }

        output
    }

    fn format_near_quota(
        &self,
        data: &[NearQuotaUser],
        threshold_percent: f64,
        estimated: bool,
    ) -> String {
        let mut output = Self::section(&format!(
            "Users at or above {threshold_percent}% of quota ({})",
            Self::label(estimated)
        ));
        if data.is_empty() {
            output.push_str("No users found.\n");
            return output;
        }

        let mut table = Self::new_table();
        table.set_titles(row![
            b -> "User",
            b -> format!("{} Requests", Self::label(estimated)),
            b -> "Monthly Quota",
            b -> "Percent of Quota"
        ]);
        for user in data {
            table.add_row(row![
                user.user,
                r -> Self::format_number(user.requests_used),
                r -> Self::format_amount(user.total_monthly_quota),
                r -> Self::format_percent(user.percent_of_quota)
            ]);
        }
        output.push_str(&table.to_string());
        output
    }

    fn format_upgrade_candidates(&self, data: &[UpgradeCandidate], estimated: bool) -> String {
        let mut output = Self::section(&format!(
            "Upgrade Candidates ({})",
            Self::label(estimated)
        ));
        if data.is_empty() {
            output.push_str("No users found.\n");
            return output;
        }

        let mut table = Self::new_table();
        table.set_titles(row![
            b -> "User",
            b -> format!("{} Requests", Self::label(estimated)),
            b -> "Monthly Quota"
        ]);
        for user in data {
            table.add_row(row![
                user.user,
                r -> Self::format_number(user.requests_used),
                r -> Self::format_amount(user.total_monthly_quota)
            ]);
        }
        output.push_str(&table.to_string());
        output
    }

    fn format_daily(&self, data: &[DailyRequests]) -> String {
        let mut output = Self::section("Requests Over Time");
        let mut table = Self::new_table();
        table.set_titles(row![b -> "Date", b -> "Requests"]);
        let mut total = 0;
        for day in data {
            total += day.total_requests;
            table.add_row(row![
                day.date.format("%Y-%m-%d"),
                r -> Self::format_number(day.total_requests)
            ]);
        }
        table.add_row(row![b -> "TOTAL", rb -> Self::format_number(total)]);
        output.push_str(&table.to_string());
        output
    }
}

/// JSON formatter for machine-readable output
///
/// Values are emitted unformatted so that the output can be consumed by
/// other tools.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &UsageReport) -> String {
        let coverage = report.coverage.as_ref();
        let output = json!({
            "summary": {
                "first_timestamp": coverage.map(|c| c.first_timestamp),
                "last_timestamp": coverage.map(|c| c.last_timestamp),
                "duration_hours": coverage.map(|c| c.duration_hours),
                "duration_days": coverage.map(|c| c.duration_days),
                "reference_month_hours": REFERENCE_MONTH_HOURS,
                "percent_of_reference_month": coverage.map(|c| c.percent_of_reference_month),
                "scaling": report.scaling,
                "total_events": report.total_events,
            },
            "requests_per_model": report.per_model,
            "requests_per_user_per_model": report.per_user_model,
            "requests_per_user": report.per_user,
            "estimated_requests_per_user": report.estimated,
            "overage": {
                "sum_overage": report.overage.sum_overage,
                "cost_overage": report.overage.cost_overage,
                "unit_cost": report.overage.unit_cost,
                "users_over_quota": report.overage.over_quota().collect::<Vec<_>>(),
            },
            "unresolved_quota_users": report.unresolved_quota_users,
        });

        format!("{output:#}")
    }

    fn format_near_quota(
        &self,
        data: &[NearQuotaUser],
        threshold_percent: f64,
        estimated: bool,
    ) -> String {
        let output = json!({
            "threshold_percent": threshold_percent,
            "estimated": estimated,
            "users": data,
        });
        format!("{output:#}")
    }

    fn format_upgrade_candidates(&self, data: &[UpgradeCandidate], estimated: bool) -> String {
        let output = json!({
            "estimated": estimated,
            "users": data,
        });
        format!("{output:#}")
    }

    fn format_daily(&self, data: &[DailyRequests]) -> String {
        let output = json!({
            "daily": data,
            "total_requests": data.iter().map(|d| d.total_requests).sum::<u64>(),
        });
        format!("{output:#}")
    }
}

/// Get appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}
