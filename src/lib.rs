//! premstat - Summarize premium request usage logs
//!
//! This library provides functionality to:
//! - Load a CSV export of premium request events, excluding unlimited-quota rows
//! - Count requests per model, per user and model, and per user
//! - Resolve each user's monthly quota and project partial-period usage to a full month
//! - Compute overage against quota and its cost
//! - Write the summary tables as CSV and render a console or JSON report
//!
//! # Examples
//!
//! ```no_run
//! use premstat::{
//!     cost_calculator::CostCalculator,
//!     data_loader::DataLoader,
//!     report::UsageReport,
//! };
//!
//! fn main() -> premstat::Result<()> {
//!     let loaded = DataLoader::new().load_file("premium_requests.csv")?;
//!     let calculator = CostCalculator::default();
//!
//!     let report = UsageReport::build(&loaded.events, &calculator);
//!     println!("Estimated overage cost: ${:.2}", report.overage.cost_overage);
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod cli;
pub mod cost_calculator;
pub mod coverage;
pub mod csv_export;
pub mod data_loader;
pub mod filters;
pub mod output;
pub mod quota;
pub mod report;

pub use premstat_core::{error, summary_types, timezone, types};

// Re-export commonly used types
pub use error::{PremstatError, Result};
pub use types::{EventTimestamp, ModelName, PremiumRequest, QuotaValue, UserId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
