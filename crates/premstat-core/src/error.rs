//! Error types for premstat
//!
//! This module defines the error types used throughout the premstat library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use premstat_core::error::{PremstatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to PremstatError
//!     let _file = std::fs::read_to_string("nonexistent.csv")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Main error type for premstat operations
///
/// Every variant is fatal for a run: the pipeline stops before any output
/// table is written.
#[derive(Error, Debug)]
pub enum PremstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required column is absent from the input header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A timestamp that could not be parsed
    #[error("Invalid timestamp on row {row}: '{value}'")]
    InvalidTimestamp {
        /// 1-based data row number (the header is row 0)
        row: usize,
        /// The raw value
        value: String,
    },

    /// A row that does not fit the header
    #[error("Malformed row {row}: {error}")]
    MalformedRow {
        /// 1-based data row number
        row: usize,
        /// The error message
        error: String,
    },

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in premstat
///
/// # Example
///
/// ```
/// use premstat_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, PremstatError>;
