//! Multi-strategy review extraction from a rendered page.
//!
//! Container strategies from the site profile are tried in order; the first
//! one yielding at least one plausible block wins and the rest are skipped.
//! Field extraction inside a block runs per-field fallback chains with
//! failures contained per field, so one broken selector never discards a
//! whole record.

mod fields;

use log::{debug, info};

use crate::model::{ANONYMOUS, Review};
use crate::page_source::PageSource;
use crate::site;

pub use fields::clean_text;

/// Extract all reviews visible on the current rendering of `page`.
///
/// Returns an empty list when no container strategy matches: a non-fatal
/// "no reviews this pass" signal, not an error. Records failing the
/// retention invariant (no rating and no text) are dropped here.
pub async fn extract_page<P: PageSource>(page: &P, product_url: &str) -> Vec<Review> {
    let blocks = match find_review_blocks(page).await {
        Some(blocks) => blocks,
        None => {
            debug!("No review blocks found on this pass");
            return Vec::new();
        }
    };

    let mut reviews = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let review = extract_block(page, block, product_url).await;
        if review.is_retainable() {
            reviews.push(review);
        }
    }
    reviews
}

/// Run the ordered container strategies; first strategy with a surviving
/// block wins. Blocks at or under the minimum text length are noise
/// (sidebar fragments, filter chips) and never count as a match.
async fn find_review_blocks<P: PageSource>(page: &P) -> Option<Vec<P::Handle>> {
    for strategy in site::CONTAINER_STRATEGIES {
        let candidates = match page.find_all(strategy.css).await {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!("Container strategy '{}' failed: {e:#}", strategy.name);
                continue;
            }
        };

        let mut valid = Vec::new();
        for handle in candidates {
            match page.text(&handle).await {
                Ok(text) if text.trim().len() > site::MIN_BLOCK_TEXT_LEN => valid.push(handle),
                _ => {}
            }
        }

        if !valid.is_empty() {
            info!(
                "Container strategy '{}' matched {} blocks",
                strategy.name,
                valid.len()
            );
            return Some(valid);
        }
    }
    None
}

/// Extract one review record from a block. Every field has its own fallback
/// chain and its own documented default; nothing here aborts the record.
async fn extract_block<P: PageSource>(page: &P, block: &P::Handle, product_url: &str) -> Review {
    let reviewer_name = fields::first_text(page, block, site::NAME_CHAIN)
        .await
        .unwrap_or_else(|| ANONYMOUS.to_string());

    let rating = fields::rating(page, block).await;
    let review = fields::review_text(page, block).await;
    let relative_date = fields::date_candidate(page, block).await;

    Review {
        platform: site::PLATFORM.to_string(),
        reviewer_name,
        rating,
        review,
        relative_date,
        review_date: None,
        product_url: product_url.to_string(),
    }
}
