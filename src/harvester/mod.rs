//! Per-job orchestration: drives the product loop end to end.
//!
//! Products are processed strictly sequentially on the worker task: one
//! browser session at a time, with think-time pacing between interactions.
//! A failing product is isolated: its error is recorded and the loop moves
//! on. Session teardown runs on every exit path before the next product.

mod runner;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::config::ScrapeJob;
use crate::dates;
use crate::dedup::DedupSet;
use crate::export;
use crate::extractor;
use crate::page_source::{PageSource, SessionFactory, locate_first};
use crate::paginator::{Pacing, Paginator};
use crate::progress::{JobStatus, ProgressTracker};
use crate::sink::CsvSink;
use crate::site;

pub use runner::{CancelToken, JobRunner};

/// Message reported when a job completes without accepting any review.
/// Completed-with-zero is a success, not an error.
pub const NO_REVIEWS_MESSAGE: &str = "No reviews found";

/// Run one job to completion on the current task.
///
/// Sets the tracker's terminal status itself on the success path; the
/// caller handles the `Err` path (job-level failure before any product
/// could run, e.g. the output directory cannot be created).
pub async fn harvest_job<F: SessionFactory>(
    factory: &F,
    job: &ScrapeJob,
    tracker: &ProgressTracker,
    cancel: &CancelToken,
    pacing: Pacing,
) -> Result<()> {
    std::fs::create_dir_all(job.output_dir()).with_context(|| {
        format!(
            "Failed to create output directory {}",
            job.output_dir().display()
        )
    })?;
    let sink = CsvSink::new(job.csv_path());

    let total_products = job.product_urls().len();
    for (index, url) in job.product_urls().iter().enumerate() {
        if cancel.is_cancelled() {
            info!("Stop requested, skipping remaining products");
            break;
        }
        info!("Product {}/{}: {url}", index + 1, total_products);

        let mut page = match factory.open(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Failed to open product {}: {e:#}", index + 1);
                tracker.record_product_error(format!("product {}: {e:#}", index + 1));
                continue;
            }
        };

        if let Err(e) = harvest_product(&mut page, url, job, tracker, &sink, cancel, pacing).await {
            warn!("Product {} failed: {e:#}", index + 1);
            tracker.record_product_error(format!("product {}: {e:#}", index + 1));
        }

        if let Err(e) = page.close().await {
            warn!("Session teardown failed: {e:#}");
        }
    }

    let total = tracker.snapshot().total_reviews;
    if total > 0 {
        info!("Job complete: {total} reviews collected");
        if let Err(e) = export::convert_to_xlsx(job.csv_path(), job.xlsx_path()) {
            warn!("Spreadsheet export failed (dataset is still available): {e:#}");
        }
        tracker.finish(JobStatus::Completed, None);
    } else {
        info!("Job complete: no reviews matched");
        tracker.finish(JobStatus::Completed, Some(NO_REVIEWS_MESSAGE.to_string()));
    }
    Ok(())
}

/// Run the extract → dedup → filter → sink loop for one product session.
async fn harvest_product<P: PageSource>(
    page: &mut P,
    product_url: &str,
    job: &ScrapeJob,
    tracker: &ProgressTracker,
    sink: &CsvSink,
    cancel: &CancelToken,
    pacing: Pacing,
) -> Result<()> {
    dismiss_login_popup(page, pacing).await;
    go_to_reviews(page, pacing).await;

    if !wait_for_content(page, pacing).await {
        warn!("No rating badge appeared within the wait window; extracting anyway");
    }

    let mut paginator = Paginator::new(pacing);
    paginator.detect(page).await;

    let mut dedup = DedupSet::new();
    let today = chrono::Local::now().date_naive();

    for iteration in 1..=job.max_iterations() {
        if cancel.is_cancelled() {
            info!("Stop requested, ending product loop at iteration {iteration}");
            break;
        }
        tracker.record_iteration(iteration);

        let extracted = extractor::extract_page(page, product_url).await;
        let mut batch = Vec::new();
        for mut review in extracted {
            // Dedup before the date filter so overlapping views never
            // inflate counters, whatever their dates resolve to.
            if !dedup.admit(&review) {
                continue;
            }
            review.review_date = review
                .relative_date
                .as_deref()
                .and_then(|raw| dates::parse_review_date(raw, today));
            let Some(date) = review.review_date else {
                continue;
            };
            if dates::in_range(date, job.from_date(), job.to_date()) {
                batch.push(review);
            }
        }

        if batch.is_empty() {
            debug!("No new in-range reviews on iteration {iteration}");
        } else {
            match sink.append(&batch) {
                Ok(()) => tracker.record_batch(&batch),
                // Acknowledged data-loss policy: the batch is dropped, the
                // job keeps going.
                Err(e) => warn!("Dataset write failed, batch of {} lost: {e:#}", batch.len()),
            }
        }

        if iteration == job.max_iterations() {
            info!("Iteration cap reached ({}) for this product", iteration);
            break;
        }
        if !paginator.advance(page).await {
            info!("End of content after {iteration} iterations");
            break;
        }
    }
    Ok(())
}

/// Poll for a rating badge until one renders or the wait window closes.
/// Review listings hydrate client-side; extracting straight after
/// navigation can race an empty DOM.
async fn wait_for_content<P: PageSource>(page: &P, pacing: Pacing) -> bool {
    let (timeout_ms, poll_ms) = pacing.content_wait_ms;
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if let Ok(handles) = page.find_all(site::RATING_PROBE).await
            && !handles.is_empty()
        {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(poll_ms)).await;
    }
}

/// Close the login popup that covers freshly opened product pages.
/// Absence is the common case and not an error.
async fn dismiss_login_popup<P: PageSource>(page: &P, pacing: Pacing) {
    match locate_first(page, site::LOGIN_POPUP_CLOSE).await {
        Some(close) => {
            if let Err(e) = page.click(&close).await {
                debug!("Could not close login popup: {e:#}");
            } else {
                debug!("Login popup closed");
                pacing.think().await;
            }
        }
        None => debug!("No login popup present"),
    }
}

/// Navigate from the product page to the all-reviews view, unless the
/// session is already there. Failure leaves the session on the product
/// page, where extraction may still find the inline review section.
async fn go_to_reviews<P: PageSource>(page: &mut P, pacing: Pacing) {
    if page.current_url().await.contains(site::REVIEWS_PATH) {
        debug!("Already on the all-reviews view");
        return;
    }

    let Some(entry) = locate_first(page, site::ALL_REVIEWS_ENTRY).await else {
        warn!("Could not find the all-reviews entry; extracting from the product page");
        return;
    };

    if let Err(e) = page.scroll_into_view(&entry).await {
        debug!("Could not scroll all-reviews entry into view: {e:#}");
    }
    pacing.think().await;
    if let Err(e) = page.click(&entry).await {
        warn!("Failed to open the all-reviews view: {e:#}");
        return;
    }
    pacing.settle().await;
}
