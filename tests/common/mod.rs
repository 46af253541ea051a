//! Common test utilities and helpers for premstat tests
//!
//! Provides a builder for premium request events and helpers that write
//! export files into temporary directories.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use premstat::types::{EventTimestamp, ModelName, PremiumRequest, QuotaValue, UserId};
use std::path::PathBuf;
use tempfile::TempDir;

/// Header of a typical premium request export
pub const EXPORT_HEADER: &str =
    "Timestamp,User,Model,Requests Used,Exceeds Monthly Quota,Total Monthly Quota";

/// Common test models
pub const TEST_MODELS: &[&str] = &["gpt-4.1", "claude-sonnet-4", "o3", "gemini-2.5-pro"];

/// Common test users
pub const TEST_USERS: &[&str] = &["alice", "bob", "carol", "dave"];

/// Start of the test month
pub fn month_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

/// Builder for creating test PremiumRequest instances
pub struct RequestBuilder {
    user: String,
    model: String,
    timestamp: DateTime<Utc>,
    quota: String,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            user: TEST_USERS[0].to_string(),
            model: TEST_MODELS[0].to_string(),
            timestamp: month_start(),
            quota: "300".to_string(),
        }
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = ts;
        self
    }

    pub fn with_hours_offset(mut self, hours: i64) -> Self {
        self.timestamp = month_start() + chrono::Duration::hours(hours);
        self
    }

    pub fn with_quota(mut self, quota: &str) -> Self {
        self.quota = quota.to_string();
        self
    }

    /// Build the PremiumRequest
    pub fn build(self) -> PremiumRequest {
        PremiumRequest {
            user: UserId::new(&self.user),
            model: ModelName::new(&self.model),
            timestamp: EventTimestamp::new(self.timestamp),
            quota: QuotaValue::parse(&self.quota),
        }
    }

    /// Build as one export row matching [`EXPORT_HEADER`]
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},1,False,{}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
            self.user,
            self.model,
            self.quota
        )
    }
}

/// `count` requests for one user, one per hour from the start of the month
pub fn hourly_requests(user: &str, model: &str, count: i64, quota: &str) -> Vec<RequestBuilder> {
    (0..count)
        .map(|i| {
            RequestBuilder::new()
                .with_user(user)
                .with_model(model)
                .with_quota(quota)
                .with_hours_offset(i)
        })
        .collect()
}

/// Render rows as a complete export file
pub fn export_csv(rows: &[RequestBuilder]) -> String {
    let mut csv = String::from(EXPORT_HEADER);
    csv.push('\n');
    for row in rows {
        csv.push_str(&row.to_csv_row());
        csv.push('\n');
    }
    csv
}

/// Write raw file contents into a fresh temporary directory
pub fn write_fixture(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("premium_requests.csv");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

/// The ten-day scenario: alice makes 100 requests, bob closes the window
pub fn ten_day_rows() -> Vec<RequestBuilder> {
    let mut rows = hourly_requests("alice", "gpt-4.1", 100, "300");
    rows.push(
        RequestBuilder::new()
            .with_user("bob")
            .with_model("o3")
            .with_hours_offset(240),
    );
    rows
}
