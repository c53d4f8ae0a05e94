//! Core configuration types for harvest jobs
//!
//! This module contains the main `ScrapeJob` struct that defines one
//! submitted harvesting run. A job is created once per submission and is
//! immutable for its lifetime.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default per-product iteration cap (pages clicked or scroll passes).
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default output directory, created on demand at job start.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// One submitted harvesting job.
///
/// **INVARIANT:** `product_urls` is non-empty and every entry passed domain
/// validation; `from_date <= to_date`; both output paths share the same
/// job-start timestamp. All enforced by the builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeJob {
    pub(crate) product_urls: Vec<String>,
    /// Inclusive lower bound of the retained date range.
    pub(crate) from_date: NaiveDate,
    /// Inclusive upper bound of the retained date range.
    pub(crate) to_date: NaiveDate,
    /// Per-product cap on extraction passes. Reaching it ends the product's
    /// loop the same way end-of-content does, but is logged distinctly.
    pub(crate) max_iterations: u32,
    pub(crate) output_dir: PathBuf,
    /// Streaming dataset destination, `reviews_<timestamp>.csv`.
    pub(crate) csv_path: PathBuf,
    /// Spreadsheet destination produced by the export step.
    pub(crate) xlsx_path: PathBuf,
}
