//! The review record produced by extraction and carried through the pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reviewer name used when no name element could be extracted.
pub const ANONYMOUS: &str = "Anonymous";

/// Number of leading review-text characters that participate in the
/// deduplication key.
pub const DEDUP_TEXT_PREFIX: usize = 50;

/// One extracted review.
///
/// `rating` is 0 when it could not be resolved; the observed site scale is
/// 1 to 5, so 0 never collides with a real rating. `date` is populated by the
/// date parser after extraction and stays `None` for unresolved strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub platform: String,
    pub reviewer_name: String,
    pub rating: u8,
    /// Title and body joined with " - ", "READ MORE" markers stripped,
    /// whitespace runs collapsed. May be empty when only a rating was found.
    pub review: String,
    /// Raw date string as rendered on the page ("5 days ago", "Oct, 2023").
    pub relative_date: Option<String>,
    /// Resolved calendar date, day granularity.
    pub review_date: Option<NaiveDate>,
    pub product_url: String,
}

impl Review {
    /// True when the record carries any signal worth keeping.
    /// Records with neither a rating nor text are extraction noise.
    #[must_use]
    pub fn is_retainable(&self) -> bool {
        self.rating != 0 || !self.review.is_empty()
    }

    /// Deduplication key: reviewer name plus the first
    /// [`DEDUP_TEXT_PREFIX`] characters of the review text.
    ///
    /// Scoped to one product pass; different products may legitimately share
    /// a reviewer and snippet, so the set holding these keys is discarded
    /// between products.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        let prefix: String = self.review.chars().take(DEDUP_TEXT_PREFIX).collect();
        format!("{}_{}", self.reviewer_name, prefix)
    }
}
