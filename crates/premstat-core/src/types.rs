//! Core domain types for premstat
//!
//! This module contains the fundamental types used throughout the premstat
//! library: strongly-typed user and model identifiers, event timestamps,
//! per-row quota values and the normalized premium request event itself.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hours in the reference month used to normalize partial-period usage (31 × 24)
pub const REFERENCE_MONTH_HOURS: f64 = 31.0 * 24.0;

/// Observed coverage, in days, at or above which a dataset counts as a full month
pub const FULL_MONTH_DAYS: f64 = 30.0;

/// Quota value that exports use to mean "no ceiling"
pub const UNLIMITED_QUOTA_SENTINEL: i64 = i32::MAX as i64;

/// Textual form of the unlimited quota
pub const UNLIMITED_QUOTA_LABEL: &str = "Unlimited";

/// Strongly-typed user identifier
///
/// User values are compared exactly; no case folding is applied.
///
/// # Examples
/// ```
/// use premstat_core::types::UserId;
///
/// let user = UserId::new("octocat");
/// assert_eq!(user.as_str(), "octocat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId from any string-like type
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strongly-typed model name wrapper
///
/// # Examples
/// ```
/// use premstat_core::types::ModelName;
///
/// let model = ModelName::new("gpt-4.1");
/// assert_eq!(model.as_str(), "gpt-4.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelName(String);

impl ModelName {
    /// Create a new ModelName from any string-like type
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UTC timestamp of a single premium request
///
/// # Examples
/// ```
/// use premstat_core::types::EventTimestamp;
/// use chrono_tz::Tz;
///
/// let ts = EventTimestamp::parse("2025-06-01T08:30:00Z", &Tz::UTC).unwrap();
/// assert_eq!(ts.to_daily_date(&Tz::UTC).to_string(), "2025-06-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventTimestamp(DateTime<Utc>);

/// Naive layouts accepted after RFC 3339 fails
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

impl EventTimestamp {
    /// Create a new EventTimestamp
    pub fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the inner DateTime
    pub fn inner(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parse a timestamp as it appears in usage exports
    ///
    /// Values carrying an offset (RFC 3339, `Z` or `+hh:mm`) are converted to
    /// UTC directly. Naive date-times and bare dates are interpreted in `tz`.
    /// Returns `None` when no supported layout matches.
    pub fn parse(raw: &str, tz: &Tz) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        // "2025-06-01 08:30:00+00:00" style, as written by spreadsheet tools
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Some(Self(dt.with_timezone(&Utc)));
        }

        let naive_raw = raw.strip_suffix('Z').unwrap_or(raw);
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(naive_raw, format) {
                return Self::from_naive(naive, tz);
            }
        }

        NaiveDate::parse_from_str(naive_raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .and_then(|naive| Self::from_naive(naive, tz))
    }

    fn from_naive(naive: NaiveDateTime, tz: &Tz) -> Option<Self> {
        // Ambiguous local times (DST fall-back) resolve to the earlier instant
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Calendar date of this timestamp in the given timezone
    pub fn to_daily_date(&self, tz: &Tz) -> NaiveDate {
        self.0.with_timezone(tz).date_naive()
    }
}

impl fmt::Display for EventTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

/// Quota value carried on a single event row
///
/// # Examples
/// ```
/// use premstat_core::types::QuotaValue;
///
/// assert_eq!(QuotaValue::parse("300"), QuotaValue::Limited(300.0));
/// assert_eq!(QuotaValue::parse("Unlimited"), QuotaValue::Unlimited);
/// assert_eq!(QuotaValue::parse("2147483647"), QuotaValue::Unlimited);
/// assert!(QuotaValue::parse("n/a").as_limit().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuotaValue {
    /// A numeric monthly ceiling
    Limited(f64),
    /// The "no ceiling" sentinel
    Unlimited,
    /// Present but neither numeric nor the sentinel; treated as missing
    Invalid(String),
}

impl QuotaValue {
    /// Parse a raw quota cell
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(UNLIMITED_QUOTA_LABEL) {
            return Self::Unlimited;
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value == UNLIMITED_QUOTA_SENTINEL as f64 => Self::Unlimited,
            Ok(value) if value.is_finite() => Self::Limited(value),
            _ => Self::Invalid(trimmed.to_string()),
        }
    }

    /// Whether a raw cell marks its row as excluded from every table
    ///
    /// Stricter than [`QuotaValue::parse`]: the label must be exactly
    /// `Unlimited`. Other casings keep the row and only resolve to no quota.
    pub fn is_exclusion_sentinel(raw: &str) -> bool {
        if raw == UNLIMITED_QUOTA_LABEL {
            return true;
        }
        matches!(raw.trim().parse::<f64>(), Ok(value) if value == UNLIMITED_QUOTA_SENTINEL as f64)
    }

    /// Whether this value is the unlimited sentinel
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Numeric ceiling, if there is one
    pub fn as_limit(&self) -> Option<f64> {
        match self {
            Self::Limited(value) => Some(*value),
            Self::Unlimited | Self::Invalid(_) => None,
        }
    }
}

/// A single normalized premium request event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumRequest {
    /// User who consumed the request
    pub user: UserId,
    /// Model the request was made against
    pub model: ModelName,
    /// When the request happened
    pub timestamp: EventTimestamp,
    /// Quota context of the row
    pub quota: QuotaValue,
}
