//! Background job execution with single-job mutual exclusion.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::error;
use parking_lot::Mutex;

use super::harvest_job;
use crate::config::ScrapeJob;
use crate::error::{HarvestError, HarvestResult};
use crate::page_source::SessionFactory;
use crate::paginator::Pacing;
use crate::progress::{JobStatus, ProgressState, ProgressTracker};

/// Cooperative cancellation flag, checked at iteration and product
/// boundaries. Best-effort: a stop never preempts an in-flight wait.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Owns the single job slot: accepts one job at a time, runs it on a
/// spawned worker task, and serves progress snapshots to any caller.
pub struct JobRunner<F> {
    factory: Arc<F>,
    tracker: Arc<ProgressTracker>,
    cancel: Mutex<CancelToken>,
    pacing: Pacing,
}

impl<F> JobRunner<F>
where
    F: SessionFactory + 'static,
{
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self::with_pacing(factory, Pacing::DEFAULT)
    }

    #[must_use]
    pub fn with_pacing(factory: F, pacing: Pacing) -> Self {
        Self {
            factory: Arc::new(factory),
            tracker: Arc::new(ProgressTracker::new()),
            cancel: Mutex::new(CancelToken::new()),
            pacing,
        }
    }

    /// Shared handle to the progress tracker, for status surfaces.
    #[must_use]
    pub fn tracker(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.tracker)
    }

    /// Submit a job. Rejected outright while another job's running flag is
    /// set; otherwise the job starts on a background task and this returns
    /// immediately.
    pub fn start(&self, job: ScrapeJob) -> HarvestResult<()> {
        if !self.tracker.begin(&job) {
            return Err(HarvestError::AlreadyRunning);
        }

        let token = CancelToken::new();
        *self.cancel.lock() = token.clone();

        let factory = Arc::clone(&self.factory);
        let tracker = Arc::clone(&self.tracker);
        let pacing = self.pacing;
        tokio::spawn(async move {
            if let Err(e) = harvest_job(factory.as_ref(), &job, &tracker, &token, pacing).await {
                error!("Job failed: {e:#}");
                tracker.finish(JobStatus::Error, Some(format!("{e:#}")));
            }
        });
        Ok(())
    }

    /// Request a stop. Acknowledged immediately; the worker observes the
    /// flag at its next loop boundary.
    pub fn stop(&self) {
        self.cancel.lock().cancel();
    }

    /// Current progress snapshot; always well-formed, even mid-failure.
    #[must_use]
    pub fn status(&self) -> ProgressState {
        self.tracker.snapshot()
    }
}
