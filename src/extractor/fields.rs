//! Per-field fallback-chain extraction within one review block.

use log::trace;

use crate::page_source::PageSource;
use crate::site;

/// Boilerplate marker appended to truncated review bodies.
const READ_MORE_MARKER: &str = "READ MORE";

/// Year-prefix tokens used by the date-candidate heuristic.
const YEAR_TOKENS: &[&str] = &["202", "201"];

/// First non-empty text found by walking a selector chain within `block`.
pub(super) async fn first_text<P: PageSource>(
    page: &P,
    block: &P::Handle,
    chain: &[&str],
) -> Option<String> {
    for selector in chain {
        let handles = match page.find_in(block, selector).await {
            Ok(handles) => handles,
            Err(e) => {
                trace!("Field selector '{selector}' failed: {e:#}");
                continue;
            }
        };
        for handle in &handles {
            if let Ok(text) = page.text(handle).await {
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
        }
    }
    None
}

/// Rating badge parsed as an integer on the 1-5 scale; 0 when absent,
/// unparsable, or out of scale.
pub(super) async fn rating<P: PageSource>(page: &P, block: &P::Handle) -> u8 {
    let Some(text) = first_text(page, block, site::RATING_CHAIN).await else {
        return 0;
    };
    match text.trim().parse::<u8>() {
        Ok(value) if (1..=5).contains(&value) => value,
        _ => 0,
    }
}

/// Optional title plus optional body, joined with " - " when both present.
pub(super) async fn review_text<P: PageSource>(page: &P, block: &P::Handle) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(title) = first_text(page, block, site::TITLE_CHAIN).await {
        parts.push(title);
    }
    if let Some(body) = first_text(page, block, site::BODY_CHAIN).await {
        parts.push(body.replace(READ_MORE_MARKER, ""));
    }
    clean_text(&parts.join(" - "))
}

/// Pick the raw date string from the block's date-candidate nodes.
///
/// The candidate classes are shared with other footer text, so prefer the
/// first candidate that looks like a date (contains "ago" or a year token);
/// when none qualifies, fall back to the last candidate in document order.
pub(super) async fn date_candidate<P: PageSource>(page: &P, block: &P::Handle) -> Option<String> {
    let mut candidates = Vec::new();
    for selector in site::DATE_CHAIN {
        let Ok(handles) = page.find_in(block, selector).await else {
            continue;
        };
        for handle in &handles {
            if let Ok(text) = page.text(handle).await {
                let text = text.trim();
                if !text.is_empty() {
                    candidates.push(text.to_string());
                }
            }
        }
    }

    candidates
        .iter()
        .find(|text| looks_like_date(text))
        .cloned()
        .or_else(|| candidates.last().cloned())
}

fn looks_like_date(text: &str) -> bool {
    text.contains("ago") || YEAR_TOKENS.iter().any(|token| text.contains(token))
}

/// Collapse whitespace runs (including newlines) to single spaces.
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
