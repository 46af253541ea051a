//! CSV export of report tables
//!
//! Writes the four summary tables of a [`UsageReport`] into a directory,
//! replacing any previous run's files. Headers are always written, even for
//! empty tables.

use crate::error::Result;
use crate::report::UsageReport;
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Requests per model
pub const REQUESTS_PER_MODEL_FILE: &str = "requests_per_model.csv";
/// Requests per user and model
pub const REQUESTS_PER_USER_PER_MODEL_FILE: &str = "requests_per_user_per_model.csv";
/// Requests per user with quota
pub const REQUESTS_PER_USER_FILE: &str = "requests_per_user.csv";
/// Estimated monthly requests per user with quota
pub const ESTIMATED_REQUESTS_PER_USER_FILE: &str = "estimated_requests_per_user.csv";

const MODEL_HEADERS: &[&str] = &["model", "requests_used"];
const USER_MODEL_HEADERS: &[&str] = &["user", "model", "requests_used"];
const USER_HEADERS: &[&str] = &["user", "requests_used", "total_monthly_quota"];
const ESTIMATED_HEADERS: &[&str] = &["user", "estimated_requests_used", "total_monthly_quota"];

/// Serialize rows as CSV into any writer
pub fn write_table<W: Write, T: Serialize>(writer: W, headers: &[&str], rows: &[T]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_table_file<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_table(file, headers, rows)?;
    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write all four report tables into `dir`, returning the paths written
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be written
pub fn write_report_tables(report: &UsageReport, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let per_model = dir.join(REQUESTS_PER_MODEL_FILE);
    write_table_file(&per_model, MODEL_HEADERS, &report.per_model)?;

    let per_user_model = dir.join(REQUESTS_PER_USER_PER_MODEL_FILE);
    write_table_file(&per_user_model, USER_MODEL_HEADERS, &report.per_user_model)?;

    let per_user = dir.join(REQUESTS_PER_USER_FILE);
    write_table_file(&per_user, USER_HEADERS, &report.per_user)?;

    let estimated = dir.join(ESTIMATED_REQUESTS_PER_USER_FILE);
    write_table_file(&estimated, ESTIMATED_HEADERS, &report.estimated)?;

    info!("Wrote report tables to {}", dir.display());
    Ok(vec![per_model, per_user_model, per_user, estimated])
}
