//! Aggregation module for counting premium requests
//!
//! This module groups normalized events into the summary tables of a report.
//! Every table counts *occurrences*: one event is one premium request.
//!
//! - per model ([`ModelSummary`])
//! - per user and model ([`UserModelSummary`])
//! - per user ([`UserTotal`], before a quota is attached)
//! - per calendar day ([`DailyRequests`])
//!
//! Grouping keys are compared exactly. Per-model and per-user-per-model rows
//! come out in key order; per-user totals are sorted by usage, descending.
//!
//! # Examples
//!
//! ```
//! use premstat::aggregation::Aggregator;
//! use premstat::types::{EventTimestamp, ModelName, PremiumRequest, QuotaValue, UserId};
//! use chrono::Utc;
//!
//! let event = |user: &str, model: &str| PremiumRequest {
//!     user: UserId::new(user),
//!     model: ModelName::new(model),
//!     timestamp: EventTimestamp::new(Utc::now()),
//!     quota: QuotaValue::Limited(300.0),
//! };
//! let events = vec![event("alice", "gpt-4.1"), event("bob", "gpt-4.1"), event("alice", "o3")];
//!
//! let tables = Aggregator::summarize(&events);
//! assert_eq!(tables.per_model.len(), 2);
//! assert_eq!(tables.per_user[0].user.as_str(), "alice");
//! assert_eq!(tables.per_user[0].requests_used, 2);
//! ```

use crate::summary_types::{ModelSummary, UserModelSummary};
use crate::timezone::TimezoneConfig;
use crate::types::{ModelName, PremiumRequest, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Total requests for one user, before quota resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTotal {
    pub user: UserId,
    pub requests_used: u64,
}

/// Requests counted on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRequests {
    pub date: NaiveDate,
    pub total_requests: u64,
}

/// The three count tables derived from one event set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageTables {
    pub per_model: Vec<ModelSummary>,
    pub per_user_model: Vec<UserModelSummary>,
    pub per_user: Vec<UserTotal>,
}

/// Groups premium request events into summary tables
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    timezone_config: TimezoneConfig,
}

impl Aggregator {
    /// Create a new Aggregator; the timezone only affects calendar-day grouping
    pub fn new(timezone_config: TimezoneConfig) -> Self {
        Self { timezone_config }
    }

    /// Get the timezone configuration
    pub fn timezone_config(&self) -> &TimezoneConfig {
        &self.timezone_config
    }

    /// Build all three count tables
    pub fn summarize(events: &[PremiumRequest]) -> UsageTables {
        let per_model = Self::requests_per_model(events);
        let per_user_model = Self::requests_per_user_per_model(events);
        let per_user = Self::requests_per_user(&per_user_model);

        debug!(
            "Aggregated {} events into {} models, {} user/model pairs, {} users",
            events.len(),
            per_model.len(),
            per_user_model.len(),
            per_user.len()
        );

        UsageTables {
            per_model,
            per_user_model,
            per_user,
        }
    }

    /// Count events per model
    pub fn requests_per_model(events: &[PremiumRequest]) -> Vec<ModelSummary> {
        let mut counts: BTreeMap<&ModelName, u64> = BTreeMap::new();
        for event in events {
            *counts.entry(&event.model).or_default() += 1;
        }

        counts
            .into_iter()
            .map(|(model, requests_used)| ModelSummary {
                model: model.clone(),
                requests_used,
            })
            .collect()
    }

    /// Count events per (user, model) pair
    pub fn requests_per_user_per_model(events: &[PremiumRequest]) -> Vec<UserModelSummary> {
        let mut counts: BTreeMap<(&UserId, &ModelName), u64> = BTreeMap::new();
        for event in events {
            *counts.entry((&event.user, &event.model)).or_default() += 1;
        }

        counts
            .into_iter()
            .map(|((user, model), requests_used)| UserModelSummary {
                user: user.clone(),
                model: model.clone(),
                requests_used,
            })
            .collect()
    }

    /// Sum the per-user-per-model table into per-user totals
    ///
    /// The result is sorted by `requests_used` descending. The sort is stable,
    /// so users with equal totals stay in user order.
    pub fn requests_per_user(per_user_model: &[UserModelSummary]) -> Vec<UserTotal> {
        let mut totals: BTreeMap<&UserId, u64> = BTreeMap::new();
        for row in per_user_model {
            *totals.entry(&row.user).or_default() += row.requests_used;
        }

        let mut per_user: Vec<UserTotal> = totals
            .into_iter()
            .map(|(user, requests_used)| UserTotal {
                user: user.clone(),
                requests_used,
            })
            .collect();
        per_user.sort_by(|a, b| b.requests_used.cmp(&a.requests_used));
        per_user
    }

    /// Count events per calendar day in the configured timezone
    pub fn requests_per_day(&self, events: &[PremiumRequest]) -> Vec<DailyRequests> {
        let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for event in events {
            let date = event.timestamp.to_daily_date(&self.timezone_config.tz);
            *counts.entry(date).or_default() += 1;
        }

        counts
            .into_iter()
            .map(|(date, total_requests)| DailyRequests {
                date,
                total_requests,
            })
            .collect()
    }
}
