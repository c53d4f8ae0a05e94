//! Per-product deduplication of extracted reviews.
//!
//! Both pagination modes re-render previously seen reviews (infinite scroll
//! re-extracts the whole accumulated list every pass), so every extracted
//! record is checked against this set before it can reach the date filter,
//! the sink, or the progress counters.

use std::collections::HashSet;

use crate::model::Review;

/// Set of composite dedup keys seen during one product pass.
///
/// One instance per product; discarded when the product finishes so
/// legitimately identical reviewer/snippet pairs on other products survive.
#[derive(Debug, Default)]
pub struct DedupSet {
    seen: HashSet<String>,
}

impl DedupSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Has this key been marked during this pass?
    #[must_use]
    pub fn seen(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Mark a key as emitted.
    pub fn mark(&mut self, key: String) {
        self.seen.insert(key);
    }

    /// Check-and-mark in one step; returns true the first time a review's
    /// key is observed.
    pub fn admit(&mut self, review: &Review) -> bool {
        self.seen.insert(review.dedup_key())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
