//! CLI interface for premstat
//!
//! This module defines the command-line interface using clap. Every
//! subcommand reads the same premium request export; `report` is the default
//! when no subcommand is given.
//!
//! # Example
//!
//! ```bash
//! # Write the four summary CSVs into ./out and print the report
//! premstat premium_requests.csv --output-dir out
//!
//! # Users at or above 80% of their estimated monthly quota
//! premstat premium_requests.csv near-quota --threshold 80 --estimated
//!
//! # Requests per day as JSON
//! premstat premium_requests.csv --json daily
//! ```

use crate::cost_calculator::DEFAULT_UNIT_COST;
use crate::error::{PremstatError, Result};
use crate::filters::{DEFAULT_PLAN_QUOTA, DEFAULT_THRESHOLD_PERCENT, DEFAULT_UPGRADE_MIN_REQUESTS};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Summarize premium request usage and estimate monthly overage
#[derive(Parser, Debug, Clone)]
#[command(name = "premstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Premium request export (CSV)
    #[arg(env = "PREMSTAT_INPUT")]
    pub input: PathBuf,

    /// Directory the summary CSVs are written into
    #[arg(long, short = 'o', env = "PREMSTAT_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Price of one premium request beyond quota, in USD
    #[arg(long, env = "PREMSTAT_UNIT_COST", default_value_t = DEFAULT_UNIT_COST)]
    pub unit_cost: f64,

    /// Column holding the monthly quota (also used for unlimited-quota detection)
    #[arg(long)]
    pub quota_column: Option<String>,

    /// Field delimiter of the input file
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Timezone for naive timestamps and calendar days (e.g. "America/New_York")
    /// If not specified, UTC is used
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use the system's local timezone (ignored when --timezone is given)
    #[arg(long, global = true)]
    pub local: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Only show warnings and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Show debug output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Write the summary CSVs and print the usage report
    Report,

    /// Show users at or above a percentage of their monthly quota
    NearQuota {
        /// Threshold in percent of quota (0-100)
        #[arg(long, short = 't', default_value_t = DEFAULT_THRESHOLD_PERCENT)]
        threshold: f64,

        /// Use the estimated monthly usage instead of actual usage
        #[arg(long)]
        estimated: bool,
    },

    /// Show base-plan users whose usage justifies a plan upgrade
    UpgradeCandidates {
        /// Use the estimated monthly usage instead of actual usage
        #[arg(long)]
        estimated: bool,

        /// Monthly quota of the base plan
        #[arg(long, default_value_t = DEFAULT_PLAN_QUOTA)]
        plan_quota: f64,

        /// Minimum requests to be a candidate
        #[arg(long, default_value_t = DEFAULT_UPGRADE_MIN_REQUESTS)]
        min_requests: u64,
    },

    /// Show requests per calendar day
    Daily,
}

impl Cli {
    /// The subcommand to run, defaulting to `report`
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Report)
    }
}

/// Parse a single-byte delimiter, accepting `\t` and `tab` for tabs
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }

    let bytes = s.as_bytes();
    if bytes.len() != 1 {
        return Err(PremstatError::InvalidArgument(format!(
            "delimiter must be a single ASCII character, got '{s}'"
        )));
    }
    Ok(bytes[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["premstat", "events.csv"]);
        assert_eq!(cli.input, PathBuf::from("events.csv"));
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.unit_cost, DEFAULT_UNIT_COST);
        assert_eq!(cli.delimiter, b',');
        assert!(cli.command.is_none());
        assert_eq!(cli.command(), Command::Report);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["premstat", "events.csv", "daily", "--json", "--no-color"]);
        assert!(cli.json);
        assert!(cli.no_color);
        assert_eq!(cli.command(), Command::Daily);
    }

    #[test]
    fn test_near_quota_command() {
        let cli = Cli::parse_from([
            "premstat",
            "events.csv",
            "near-quota",
            "--threshold",
            "75",
            "--estimated",
        ]);
        match cli.command() {
            Command::NearQuota {
                threshold,
                estimated,
            } => {
                assert_eq!(threshold, 75.0);
                assert!(estimated);
            }
            other => panic!("Expected NearQuota command, got {other:?}"),
        }

        let cli = Cli::parse_from(["premstat", "events.csv", "near-quota"]);
        assert_eq!(
            cli.command(),
            Command::NearQuota {
                threshold: DEFAULT_THRESHOLD_PERCENT,
                estimated: false
            }
        );
    }

    #[test]
    fn test_upgrade_candidates_defaults() {
        let cli = Cli::parse_from(["premstat", "events.csv", "upgrade-candidates"]);
        assert_eq!(
            cli.command(),
            Command::UpgradeCandidates {
                estimated: false,
                plan_quota: 300.0,
                min_requests: 800,
            }
        );
    }

    #[test]
    fn test_pipeline_options() {
        let cli = Cli::parse_from([
            "premstat",
            "events.csv",
            "--output-dir",
            "out",
            "--unit-cost",
            "0.1",
            "--quota-column",
            "Quota",
            "--delimiter",
            ";",
            "--timezone",
            "Asia/Tokyo",
        ]);
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.unit_cost, 0.1);
        assert_eq!(cli.quota_column.as_deref(), Some("Quota"));
        assert_eq!(cli.delimiter, b';');
        assert_eq!(cli.timezone.as_deref(), Some("Asia/Tokyo"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["premstat", "events.csv", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
