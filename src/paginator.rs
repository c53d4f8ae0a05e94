//! Pagination mode detection and advancement.
//!
//! Flipkart review listings come in two shapes: classic numbered pages with
//! a "Next" control, and infinite scroll. The mode is probed once per
//! product and pinned; re-detection mid-pass would misread transient DOM
//! states after a click.

use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;

use crate::page_source::{PageSource, locate_first};
use crate::site;

/// The pinned pagination mechanism for one product pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Not yet probed.
    Unknown,
    /// A "Next"-style control advances to the next page.
    ButtonPagination,
    /// Scrolling to the bottom loads more content in place.
    InfiniteScroll,
}

/// Randomized think-time delays between browser interactions, in
/// milliseconds. Mimics human pacing and gives the site time to settle.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Short pause before an interaction (scroll-into-view, click).
    pub think_ms: (u64, u64),
    /// Longer pause for content to load after a click or scroll.
    pub settle_ms: (u64, u64),
    /// Bounded wait for client-rendered review content to appear after a
    /// page opens: (timeout, poll interval). A zero timeout means a single
    /// immediate check.
    pub content_wait_ms: (u64, u64),
}

impl Pacing {
    /// Production pacing: 1-2s think, 3-5s settle, up to 10s for content
    /// to hydrate.
    pub const DEFAULT: Self = Self {
        think_ms: (1_000, 2_000),
        settle_ms: (3_000, 5_000),
        content_wait_ms: (10_000, 500),
    };

    /// No delays; used by tests against the in-memory page.
    pub const NONE: Self = Self {
        think_ms: (0, 0),
        settle_ms: (0, 0),
        content_wait_ms: (0, 0),
    };

    pub async fn think(&self) {
        sleep_in_range(self.think_ms).await;
    }

    pub async fn settle(&self) {
        sleep_in_range(self.settle_ms).await;
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

async fn sleep_in_range((min, max): (u64, u64)) {
    if max == 0 {
        return;
    }
    let ms = rand::rng().random_range(min..=max);
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// State machine over the two advancement modes.
pub struct Paginator {
    mode: PaginationMode,
    pacing: Pacing,
}

impl Paginator {
    #[must_use]
    pub fn new(pacing: Pacing) -> Self {
        Self {
            mode: PaginationMode::Unknown,
            pacing,
        }
    }

    #[must_use]
    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    /// Probe for a "Next"-style control and pin the mode for the rest of
    /// the product pass.
    pub async fn detect<P: PageSource>(&mut self, page: &P) -> PaginationMode {
        let mode = if locate_first(page, site::NEXT_CONTROL).await.is_some() {
            PaginationMode::ButtonPagination
        } else {
            PaginationMode::InfiniteScroll
        };
        info!("Detected pagination mode: {mode:?}");
        self.mode = mode;
        mode
    }

    /// Try to bring more content into view. Returns false at end of
    /// content; all internal failures are treated as end of content rather
    /// than propagated, matching the loop-termination contract.
    pub async fn advance<P: PageSource>(&mut self, page: &P) -> bool {
        if self.mode == PaginationMode::Unknown {
            self.detect(page).await;
        }
        match self.mode {
            PaginationMode::ButtonPagination => self.click_next(page).await,
            PaginationMode::InfiniteScroll => self.scroll_for_more(page).await,
            PaginationMode::Unknown => unreachable!("mode pinned by detect"),
        }
    }

    async fn click_next<P: PageSource>(&self, page: &P) -> bool {
        let Some(next) = locate_first(page, site::NEXT_CONTROL).await else {
            debug!("No Next control present, end of pages");
            return false;
        };

        if let Err(e) = page.scroll_into_view(&next).await {
            debug!("Could not scroll Next control into view: {e:#}");
        }
        self.pacing.think().await;

        if let Err(e) = page.click(&next).await {
            warn!("Failed to click Next control: {e:#}");
            return false;
        }
        self.pacing.settle().await;
        true
    }

    async fn scroll_for_more<P: PageSource>(&self, page: &P) -> bool {
        let before_count = self.rating_block_count(page).await;
        let before_height = page.document_height().await.unwrap_or(0);

        if let Err(e) = page.scroll_to_bottom().await {
            warn!("Scroll to bottom failed: {e:#}");
            return false;
        }
        self.pacing.settle().await;

        let after_count = self.rating_block_count(page).await;
        let after_height = page.document_height().await.unwrap_or(before_height);

        let grew = after_height > before_height || after_count > before_count;
        if grew {
            debug!("Loaded more reviews ({before_count} -> {after_count})");
        } else {
            debug!("No new content after scroll, end of reviews");
        }
        grew
    }

    async fn rating_block_count<P: PageSource>(&self, page: &P) -> usize {
        page.find_all(site::RATING_PROBE)
            .await
            .map(|handles| handles.len())
            .unwrap_or(0)
    }
}
