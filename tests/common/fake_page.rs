//! Scripted in-memory `PageSource` for pipeline tests.
//!
//! A `FakePage` holds an ordered list of DOM snapshots; clicking a node
//! whose text contains "Next" or scrolling to the bottom advances to the
//! next snapshot, which is how both pagination modes are scripted without a
//! browser.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use parking_lot::Mutex;
use serde_json::Value;

use review_harvester::page_source::{PageSource, SessionFactory};

#[derive(Debug, Clone, Default)]
struct Node {
    text: String,
    children: HashMap<String, Vec<usize>>,
}

/// One scripted rendering of the page: selector -> matching nodes.
#[derive(Debug, Clone)]
pub struct FakeDom {
    nodes: Vec<Node>,
    roots: HashMap<String, Vec<usize>>,
    height: i64,
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: HashMap::new(),
            height: 1000,
        }
    }

    pub fn with_height(mut self, height: i64) -> Self {
        self.height = height;
        self
    }

    /// Register a top-level node under `selector` (the literal selector
    /// string the production code queries with).
    pub fn add_root(&mut self, selector: &str, text: &str) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            text: text.to_string(),
            children: HashMap::new(),
        });
        self.roots.entry(selector.to_string()).or_default().push(id);
        id
    }

    /// Register a node under `selector` scoped to `parent`.
    pub fn add_child(&mut self, parent: usize, selector: &str, text: &str) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            text: text.to_string(),
            children: HashMap::new(),
        });
        self.nodes[parent]
            .children
            .entry(selector.to_string())
            .or_default()
            .push(id);
        id
    }
}

/// In-memory page over a sequence of DOM snapshots.
pub struct FakePage {
    snapshots: Vec<FakeDom>,
    current: AtomicUsize,
    url: Mutex<String>,
    clicks: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
    /// While positive, `find_all` reports an empty DOM and decrements;
    /// models client-side rendering that has not hydrated yet.
    pending_polls: AtomicUsize,
    on_click: Mutex<Option<Box<dyn Fn(&str) + Send + Sync>>>,
}

impl FakePage {
    pub fn new(snapshots: Vec<FakeDom>) -> Self {
        assert!(!snapshots.is_empty(), "FakePage needs at least one snapshot");
        Self {
            snapshots,
            current: AtomicUsize::new(0),
            url: Mutex::new(String::new()),
            clicks: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
            pending_polls: AtomicUsize::new(0),
            on_click: Mutex::new(None),
        }
    }

    /// Make the next `polls` selector queries see an empty, unhydrated DOM.
    pub fn delay_hydration(&self, polls: usize) {
        self.pending_polls.store(polls, Ordering::SeqCst);
    }

    /// Run `hook` with the clicked node's text on every click.
    pub fn set_click_hook(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        *self.on_click.lock() = Some(Box::new(hook));
    }

    pub fn single(dom: FakeDom) -> Self {
        Self::new(vec![dom])
    }

    /// Shared flag flipped by `close()`, for teardown assertions.
    pub fn closed_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    /// Texts of every node clicked so far.
    pub fn clicks_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.clicks)
    }

    pub fn set_url(&self, url: &str) {
        *self.url.lock() = url.to_string();
    }

    fn dom(&self) -> &FakeDom {
        &self.snapshots[self.current.load(Ordering::SeqCst)]
    }

    fn advance_snapshot(&self) {
        let last = self.snapshots.len() - 1;
        let _ = self
            .current
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                (cur < last).then_some(cur + 1)
            });
    }
}

impl PageSource for FakePage {
    type Handle = usize;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.set_url(url);
        Ok(())
    }

    async fn current_url(&self) -> String {
        self.url.lock().clone()
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<usize>> {
        let hydrated = self
            .pending_polls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |polls| {
                (polls > 0).then(|| polls - 1)
            })
            .is_err();
        if !hydrated {
            return Ok(Vec::new());
        }
        Ok(self.dom().roots.get(selector).cloned().unwrap_or_default())
    }

    async fn find_in(&self, handle: &usize, selector: &str) -> Result<Vec<usize>> {
        Ok(self.dom().nodes[*handle]
            .children
            .get(selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn text(&self, handle: &usize) -> Result<String> {
        Ok(self.dom().nodes[*handle].text.clone())
    }

    async fn scroll_into_view(&self, _handle: &usize) -> Result<()> {
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.advance_snapshot();
        Ok(())
    }

    async fn document_height(&self) -> Result<i64> {
        Ok(self.dom().height)
    }

    async fn click(&self, handle: &usize) -> Result<()> {
        let text = self.dom().nodes[*handle].text.clone();
        if text.contains("Next") {
            self.advance_snapshot();
        }
        if let Some(hook) = self.on_click.lock().as_ref() {
            hook(&text);
        }
        self.clicks.lock().push(text);
        Ok(())
    }

    async fn run_script(&self, _js: &str) -> Result<Value> {
        Ok(Value::Null)
    }

    async fn close(self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Scripted session factory: each URL maps to a queue of sessions, where
/// `None` scripts an open failure for that attempt.
#[derive(Default)]
pub struct FakeFactory {
    scripted: Mutex<HashMap<String, VecDeque<Option<FakePage>>>>,
    opens: AtomicUsize,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, url: &str, page: FakePage) {
        self.scripted
            .lock()
            .entry(url.to_string())
            .or_default()
            .push_back(Some(page));
    }

    pub fn fail(&self, url: &str) {
        self.scripted
            .lock()
            .entry(url.to_string())
            .or_default()
            .push_back(None);
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl SessionFactory for FakeFactory {
    type Session = FakePage;

    async fn open(&self, url: &str) -> Result<FakePage> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let next = self
            .scripted
            .lock()
            .get_mut(url)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Some(page)) => {
                page.set_url(url);
                Ok(page)
            }
            Some(None) => Err(anyhow!("connection refused: {url}")),
            None => Err(anyhow!("no session scripted for {url}")),
        }
    }
}
