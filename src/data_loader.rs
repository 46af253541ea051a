//! Data loader module for reading premium request exports
//!
//! This module reads a delimited usage export and normalizes every row into a
//! [`PremiumRequest`]. Header names are matched case-insensitively. Rows whose
//! quota context is the unlimited sentinel are dropped here, once, before any
//! aggregation sees them.
//!
//! # Column layout
//!
//! The export must carry `user`, `model` and `timestamp` columns. The quota
//! context of each row lives in the trailing column, conventionally named
//! `total monthly quota`:
//!
//! - the sentinel filter inspects the **last** column of the header
//! - the quota value attached to each event is read from the column named
//!   `total monthly quota` (falling back to the last column if absent)
//!
//! Both can be pinned to an explicit column with
//! [`DataLoader::with_quota_column`].
//!
//! # Examples
//!
//! ```
//! use premstat::data_loader::DataLoader;
//!
//! let csv = "User,Model,Timestamp,Total Monthly Quota\n\
//!            alice,gpt-4.1,2025-06-01T10:00:00Z,300\n\
//!            bob,gpt-4.1,2025-06-01T11:00:00Z,Unlimited\n";
//!
//! let loaded = DataLoader::new().parse_events(csv.as_bytes()).unwrap();
//! assert_eq!(loaded.events.len(), 1);
//! assert_eq!(loaded.excluded_unlimited, 1);
//! ```

use crate::error::{PremstatError, Result};
use crate::timezone::TimezoneConfig;
use crate::types::{EventTimestamp, ModelName, PremiumRequest, QuotaValue, UserId};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Conventional header of the quota column
pub const QUOTA_COLUMN: &str = "total monthly quota";

const USER_COLUMN: &str = "user";
const MODEL_COLUMN: &str = "model";
const TIMESTAMP_COLUMN: &str = "timestamp";

/// Events read from one export
#[derive(Debug, Clone, Default)]
pub struct LoadedEvents {
    /// Normalized events, in file order, with unlimited-quota rows removed
    pub events: Vec<PremiumRequest>,
    /// Number of data rows read before filtering
    pub total_rows: usize,
    /// Number of rows dropped because their quota context was unlimited
    pub excluded_unlimited: usize,
}

/// Column positions resolved from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    user: usize,
    model: usize,
    timestamp: usize,
    /// Column whose sentinel value excludes the row
    sentinel: usize,
    /// Column the per-event quota is read from
    quota: usize,
}

/// Loader for premium request exports
///
/// The loader is a pure transform from rows to events; it holds only
/// parsing options.
#[derive(Debug, Clone)]
pub struct DataLoader {
    timezone: TimezoneConfig,
    quota_column: Option<String>,
    delimiter: u8,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a loader with default options (comma-delimited, UTC, positional quota)
    pub fn new() -> Self {
        Self {
            timezone: TimezoneConfig::default(),
            quota_column: None,
            delimiter: b',',
        }
    }

    /// Timezone used for naive timestamps
    pub fn with_timezone(mut self, timezone: TimezoneConfig) -> Self {
        self.timezone = timezone;
        self
    }

    /// Use an explicit quota column instead of the trailing one
    pub fn with_quota_column(mut self, name: impl Into<String>) -> Self {
        self.quota_column = Some(name.into());
        self
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load and normalize events from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not valid delimited
    /// data, lacks a required column, or contains an unparsable timestamp.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadedEvents> {
        let path = path.as_ref();
        debug!("Loading premium request events from {}", path.display());
        let file = File::open(path)?;
        let loaded = self.parse_events(file)?;
        info!(
            "Loaded {} events from {} ({} unlimited-quota rows excluded)",
            loaded.events.len(),
            path.display(),
            loaded.excluded_unlimited
        );
        Ok(loaded)
    }

    /// Normalize events from any reader
    pub fn parse_events<R: Read>(&self, reader: R) -> Result<LoadedEvents> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let layout = self.resolve_layout(&headers)?;
        debug!("Resolved column layout: {:?}", layout);

        let mut loaded = LoadedEvents::default();
        for (index, record) in reader.records().enumerate() {
            let row = index + 1;
            let record = record.map_err(|e| PremstatError::MalformedRow {
                row,
                error: e.to_string(),
            })?;
            loaded.total_rows += 1;

            let event = self.parse_record(&record, &layout, row)?;
            if QuotaValue::is_exclusion_sentinel(field(&record, layout.sentinel)) {
                loaded.excluded_unlimited += 1;
                continue;
            }
            loaded.events.push(event);
        }

        debug!(
            "Read {} rows, kept {} events",
            loaded.total_rows,
            loaded.events.len()
        );
        Ok(loaded)
    }

    fn parse_record(
        &self,
        record: &StringRecord,
        layout: &ColumnLayout,
        row: usize,
    ) -> Result<PremiumRequest> {
        let raw_timestamp = field(record, layout.timestamp);
        // Timestamps are checked on every row, including ones dropped afterwards
        let timestamp = EventTimestamp::parse(raw_timestamp, &self.timezone.tz).ok_or_else(|| {
            PremstatError::InvalidTimestamp {
                row,
                value: raw_timestamp.to_string(),
            }
        })?;

        Ok(PremiumRequest {
            user: UserId::new(field(record, layout.user)),
            model: ModelName::new(field(record, layout.model)),
            timestamp,
            quota: QuotaValue::parse(field(record, layout.quota)),
        })
    }

    fn resolve_layout(&self, headers: &StringRecord) -> Result<ColumnLayout> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let find = |name: &str| -> Result<usize> {
            let wanted = name.trim().to_lowercase();
            normalized
                .iter()
                .position(|h| *h == wanted)
                .ok_or_else(|| PremstatError::MissingColumn(name.to_string()))
        };

        let user = find(USER_COLUMN)?;
        let model = find(MODEL_COLUMN)?;
        let timestamp = find(TIMESTAMP_COLUMN)?;

        let (sentinel, quota) = match &self.quota_column {
            Some(explicit) => {
                let column = find(explicit)?;
                (column, column)
            }
            None => {
                let last = normalized
                    .len()
                    .checked_sub(1)
                    .ok_or_else(|| PremstatError::MissingColumn(QUOTA_COLUMN.to_string()))?;
                let quota = match find(QUOTA_COLUMN) {
                    Ok(column) => column,
                    Err(_) => {
                        warn!(
                            "No '{}' column; reading quotas from trailing column '{}'",
                            QUOTA_COLUMN, normalized[last]
                        );
                        last
                    }
                };
                if quota != last {
                    warn!(
                        "'{}' is not the trailing column; unlimited rows are detected on '{}'",
                        QUOTA_COLUMN, normalized[last]
                    );
                }
                (last, quota)
            }
        };

        Ok(ColumnLayout {
            user,
            model,
            timestamp,
            sentinel,
            quota,
        })
    }
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or_default()
}
