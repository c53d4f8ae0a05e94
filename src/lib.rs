//! Streaming review harvester for Flipkart product pages.
//!
//! The pipeline detects the pagination mechanism per product, extracts
//! structured reviews through ordered fallback strategies, deduplicates
//! overlapping views, resolves relative/absolute date strings, filters to an
//! inclusive date range, and streams surviving batches to a CSV dataset
//! (with a best-effort XLSX export at the end). A background worker runs
//! one job at a time while concurrent readers poll progress snapshots.

pub mod config;
pub mod dates;
pub mod dedup;
pub mod error;
pub mod export;
pub mod extractor;
pub mod harvester;
pub mod model;
pub mod page_source;
pub mod paginator;
pub mod progress;
pub mod sink;
pub mod site;

pub use config::ScrapeJob;
pub use error::{HarvestError, HarvestResult};
pub use harvester::{CancelToken, JobRunner, harvest_job};
pub use model::Review;
pub use page_source::{ChromiumFactory, ChromiumPage, PageSource, SessionFactory};
pub use paginator::{Pacing, PaginationMode, Paginator};
pub use progress::{JobStatus, ProgressState, ProgressTracker};

use anyhow::Result;

/// Run one job to completion against real browser sessions and return the
/// final progress state. Convenience wrapper for callers that do not need
/// the background runner.
pub async fn harvest(job: ScrapeJob) -> Result<ProgressState> {
    let factory = ChromiumFactory::default();
    let tracker = ProgressTracker::new();
    tracker.begin(&job);
    let cancel = CancelToken::new();
    harvest_job(&factory, &job, &tracker, &cancel, Pacing::DEFAULT).await?;
    Ok(tracker.snapshot())
}
