//! Shared job progress: one writer (the worker), many readers.
//!
//! All reads go through [`ProgressTracker::snapshot`], a point-in-time clone
//! taken under the lock, so readers never observe a half-updated state. No
//! operation here performs I/O or blocks beyond the brief lock hold.

use std::path::Path;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::ScrapeJob;
use crate::model::Review;

/// Capacity of the most-recent-first ring of freshly accepted reviews.
pub const RECENT_REVIEWS_CAP: usize = 5;

/// Lifecycle status of the single job slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Idle,
    Running,
    Completed,
    Error,
}

/// Point-in-time view of the running (or last finished) job.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressState {
    pub is_running: bool,
    /// Current iteration within the current product's loop.
    pub current_iteration: u32,
    /// Cumulative accepted reviews across all products.
    pub total_reviews: usize,
    /// Up to [`RECENT_REVIEWS_CAP`] freshly accepted reviews, newest first.
    pub recent_reviews: Vec<Review>,
    pub status: JobStatus,
    /// Most specific available failure message; also set for the
    /// completed-with-zero-results case.
    pub error: Option<String>,
    /// One entry per product that failed to open or harvest.
    pub product_errors: Vec<String>,
    pub csv_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
}

impl ProgressState {
    fn idle() -> Self {
        Self {
            is_running: false,
            current_iteration: 0,
            total_reviews: 0,
            recent_reviews: Vec::new(),
            status: JobStatus::Idle,
            error: None,
            product_errors: Vec::new(),
            csv_file: None,
            output_file: None,
        }
    }

    fn running(csv: &Path, xlsx: &Path) -> Self {
        Self {
            is_running: true,
            status: JobStatus::Running,
            csv_file: Some(csv.to_path_buf()),
            output_file: Some(xlsx.to_path_buf()),
            ..Self::idle()
        }
    }
}

/// Single-writer/multi-reader progress state for the one job slot.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    state: Mutex<ProgressState>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::idle()
    }
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim the job slot and reset state for `job`.
    ///
    /// Returns false without touching anything when a job is already
    /// running; this is the mutual-exclusion check for submissions.
    pub fn begin(&self, job: &ScrapeJob) -> bool {
        let mut state = self.state.lock();
        if state.is_running {
            return false;
        }
        *state = ProgressState::running(job.csv_path(), job.xlsx_path());
        true
    }

    /// Record the iteration the worker just entered.
    pub fn record_iteration(&self, iteration: u32) {
        self.state.lock().current_iteration = iteration;
    }

    /// Fold an accepted batch into the totals and the recent ring.
    pub fn record_batch(&self, batch: &[Review]) {
        if batch.is_empty() {
            return;
        }
        let mut state = self.state.lock();
        state.total_reviews += batch.len();

        let mut ring = Vec::with_capacity(RECENT_REVIEWS_CAP);
        ring.extend(batch.iter().take(RECENT_REVIEWS_CAP).cloned());
        ring.extend(
            state
                .recent_reviews
                .iter()
                .take(RECENT_REVIEWS_CAP.saturating_sub(ring.len()))
                .cloned(),
        );
        state.recent_reviews = ring;
    }

    /// Record an isolated per-product failure; the job keeps going.
    pub fn record_product_error(&self, message: String) {
        let mut state = self.state.lock();
        state.error = Some(message.clone());
        state.product_errors.push(message);
    }

    /// Move the job to a terminal status and release the running flag.
    /// The state is frozen afterwards until the next `begin`.
    pub fn finish(&self, status: JobStatus, error: Option<String>) {
        let mut state = self.state.lock();
        state.is_running = false;
        state.status = status;
        if error.is_some() {
            state.error = error;
        }
    }

    /// Point-in-time copy for concurrent readers.
    #[must_use]
    pub fn snapshot(&self) -> ProgressState {
        self.state.lock().clone()
    }
}
