//! Browser session abstraction consumed by the pipeline.
//!
//! The pipeline never talks to chromiumoxide directly; everything goes
//! through [`PageSource`] so the extractor, paginator, and orchestrator are
//! testable against a scripted in-memory implementation. The production
//! implementation lives in [`chromium`].

pub mod chromium;

use std::future::Future;

use anyhow::Result;
use log::debug;

use crate::site::Locator;

pub use chromium::{ChromiumFactory, ChromiumPage};

/// One live browser session against a rendered page.
///
/// Methods return explicit `impl Future + Send`, and the session itself is
/// `Send + Sync`: the job future holds `&Session` across awaits, so it is
/// only spawnable onto the worker task when shared references are Send.
/// `Handle` is an opaque reference to a DOM node valid for the current
/// rendering of the page.
pub trait PageSource: Send + Sync {
    type Handle: Send + Sync;

    /// Navigate to `url` and wait for the page to load.
    fn navigate(&mut self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// Current URL, or a placeholder when the page has none yet.
    fn current_url(&self) -> impl Future<Output = String> + Send;

    /// All nodes matching a CSS selector, document order.
    fn find_all(&self, selector: &str) -> impl Future<Output = Result<Vec<Self::Handle>>> + Send;

    /// All nodes matching a CSS selector within `handle`, document order.
    fn find_in(
        &self,
        handle: &Self::Handle,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<Self::Handle>>> + Send;

    /// Rendered text of a node.
    fn text(&self, handle: &Self::Handle) -> impl Future<Output = Result<String>> + Send;

    fn scroll_into_view(&self, handle: &Self::Handle) -> impl Future<Output = Result<()>> + Send;

    /// Scroll the viewport to the bottom of the document.
    fn scroll_to_bottom(&self) -> impl Future<Output = Result<()>> + Send;

    /// Current document scroll height in CSS pixels.
    fn document_height(&self) -> impl Future<Output = Result<i64>> + Send;

    /// Click a node. Implementations fall back to a script-driven click when
    /// the direct click is intercepted.
    fn click(&self, handle: &Self::Handle) -> impl Future<Output = Result<()>> + Send;

    /// Evaluate a script in the page and return its JSON value.
    fn run_script(&self, js: &str) -> impl Future<Output = Result<serde_json::Value>> + Send;

    /// Tear the session down. Called on every exit path of a product pass.
    fn close(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}

/// Opens one fresh session per product.
///
/// The orchestrator owns exactly one session at a time; products are
/// processed sequentially, so implementations need not pool anything.
pub trait SessionFactory: Send + Sync {
    type Session: PageSource;

    /// Open a session already navigated to `url`.
    fn open(&self, url: &str) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// Walk an ordered locator chain and return the first matching node.
///
/// Selector lookup failures are non-fatal; a chain entry that errors or
/// matches nothing simply yields to the next entry. Text filters are applied
/// against the node's rendered text.
pub async fn locate_first<P: PageSource>(page: &P, chain: &[Locator]) -> Option<P::Handle> {
    for locator in chain {
        let handles = match page.find_all(locator.css).await {
            Ok(handles) => handles,
            Err(e) => {
                debug!("Locator '{}' failed: {e:#}", locator.css);
                continue;
            }
        };
        for handle in handles {
            if locator.text_all.is_empty() {
                return Some(handle);
            }
            match page.text(&handle).await {
                Ok(text) if locator.matches_text(&text) => return Some(handle),
                _ => {}
            }
        }
    }
    None
}
