//! Timezone utilities for timestamp handling
//!
//! Usage exports sometimes carry naive timestamps. This module decides which
//! timezone those are read in, and which timezone calendar days are bucketed
//! in. UTC is the default so that reports are reproducible across machines.

use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Configuration for timezone handling
#[derive(Debug, Clone)]
pub struct TimezoneConfig {
    /// The timezone to use for date operations
    pub tz: Tz,
    /// Whether the timezone is UTC
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self {
            tz: Tz::UTC,
            is_utc: true,
        }
    }
}

impl TimezoneConfig {
    /// Create a new timezone configuration from CLI arguments
    ///
    /// An explicit timezone name wins over `use_local`; with neither, UTC.
    pub fn from_cli(timezone_str: Option<&str>, use_local: bool) -> crate::error::Result<Self> {
        if let Some(tz_str) = timezone_str {
            let tz = Tz::from_str(tz_str).map_err(|_| {
                crate::error::PremstatError::InvalidTimezone(format!(
                    "'{tz_str}'. Use format like 'America/New_York', 'Asia/Tokyo', or 'UTC'"
                ))
            })?;
            return Ok(Self::for_tz(tz));
        }

        if use_local {
            return Ok(Self::for_tz(get_local_timezone()));
        }

        Ok(Self::default())
    }

    fn for_tz(tz: Tz) -> Self {
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }

    /// Get the display name for the configured timezone
    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }
}

/// Detect the system's local timezone
///
/// Checks the `TZ` environment variable first, then asks the operating
/// system. Falls back to UTC if detection fails.
pub fn get_local_timezone() -> Tz {
    #[allow(clippy::collapsible_if)]
    if let Ok(tz_str) = std::env::var("TZ") {
        if let Ok(tz) = Tz::from_str(&tz_str) {
            debug!("Using timezone from TZ environment variable: {}", tz_str);
            return tz;
        }
    }

    match iana_time_zone::get_timezone() {
        Ok(tz_str) => match Tz::from_str(&tz_str) {
            Ok(tz) => {
                debug!("Using system timezone from iana-time-zone: {}", tz_str);
                tz
            }
            Err(_) => {
                debug!(
                    "Could not parse timezone from iana-time-zone: '{}', falling back to UTC",
                    tz_str
                );
                Tz::UTC
            }
        },
        Err(e) => {
            debug!(
                "Could not detect local timezone via iana-time-zone: {:?}, falling back to UTC",
                e
            );
            Tz::UTC
        }
    }
}
