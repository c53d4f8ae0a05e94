//! Error types for the harvesting surface.
//!
//! The enumerable, user-facing failures live here; internal seams use
//! `anyhow` with context the way the browser layer does.

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias for harvester operations.
pub type HarvestResult<T> = Result<T, HarvestError>;

/// Failures surfaced to job submitters.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// A job is already running; exactly one job may run at a time.
    #[error("a scrape job is already in progress")]
    AlreadyRunning,

    /// No submitted URL survived domain validation.
    #[error("no valid Flipkart product URL was provided")]
    NoValidUrls,

    /// The inclusive date range is inverted.
    #[error("invalid date range: from {from} is after to {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    /// Dataset write failure.
    #[error("dataset write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure (output directory, dataset file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
