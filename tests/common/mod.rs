//! Shared helpers for the review-harvester test suite.

pub mod fake_page;

use review_harvester::site;

pub use fake_page::{FakeDom, FakeFactory, FakePage};

/// Register a complete review block (name, rating badge, body, footer date
/// line) under the primary container strategy, mirroring the markup shape
/// the extractor expects: the reviewer name shares the footer class with
/// the date, so both land in the date-candidate chain.
#[allow(dead_code)]
pub fn add_review(dom: &mut FakeDom, name: &str, rating: u8, body: &str, date: &str) -> usize {
    let block_text = format!("{rating} {body} {name} Certified Buyer {date}");
    let block = dom.add_root(site::CONTAINER_STRATEGIES[0].css, &block_text);
    dom.add_child(block, site::NAME_CHAIN[0], name);
    dom.add_child(block, site::RATING_CHAIN[0], &rating.to_string());
    dom.add_child(block, site::BODY_CHAIN[0], body);
    dom.add_child(block, site::DATE_CHAIN[0], name);
    dom.add_child(block, site::DATE_CHAIN[0], "Certified Buyer, Pune");
    dom.add_child(block, site::DATE_CHAIN[0], date);
    // The scroll prober counts rating badges page-wide.
    dom.add_root(site::RATING_PROBE, &rating.to_string());
    block
}

/// Register a "Next" pagination control.
#[allow(dead_code)]
pub fn add_next_button(dom: &mut FakeDom) {
    dom.add_root(site::NEXT_CONTROL[0].css, "Next");
}
