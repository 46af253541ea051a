//! Core types, errors, and utilities for premstat
//!
//! This crate provides the domain types for premium request events and
//! the summary tables derived from them, the shared error type, and
//! timezone configuration used when interpreting naive timestamps.

pub mod error;
pub mod summary_types;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use error::{PremstatError, Result};
pub use summary_types::{
    CoverageWindow, EstimatedUserSummary, ModelSummary, QuotaUsage, UserModelSummary, UserSummary,
};
pub use types::{EventTimestamp, ModelName, PremiumRequest, QuotaValue, UserId};
