//! Flipkart site profile: selector tables, URL validation, and the
//! reviews-view marker.
//!
//! Every selector the pipeline touches lives here so a site redesign is a
//! one-file change. Chains are ordered newest-layout-first; the extractor and
//! paginator walk them in order and stop at the first hit.

use url::Url;

/// Platform identifier written into every persisted row.
pub const PLATFORM: &str = "Flipkart";

/// Path fragment that marks the dedicated all-reviews view.
/// Navigation is skipped when the current URL already contains it.
pub const REVIEWS_PATH: &str = "/product-reviews/";

/// Minimum rendered text length for a candidate review block.
/// Shorter blocks are sidebar/noise elements, not reviews.
pub const MIN_BLOCK_TEXT_LEN: usize = 20;

/// A DOM locator: a CSS selector plus an optional rendered-text filter.
///
/// CSS cannot match on text content, but several Flipkart controls (the
/// "Next" pagination link, the "All reviews" entry) are only reliably
/// identified by their label. `text_all` lists fragments that must all be
/// present in the element's rendered text; an empty slice accepts any match.
#[derive(Debug, Clone, Copy)]
pub struct Locator {
    pub css: &'static str,
    pub text_all: &'static [&'static str],
}

impl Locator {
    /// True when `text` satisfies this locator's text filter.
    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        self.text_all.iter().all(|frag| text.contains(frag))
    }
}

/// An ordered container-selector strategy for locating review blocks.
#[derive(Debug, Clone, Copy)]
pub struct ContainerStrategy {
    /// Short name used in logs when the strategy wins.
    pub name: &'static str,
    pub css: &'static str,
}

/// Review-block container strategies, tried in order. The first strategy
/// yielding at least one block longer than [`MIN_BLOCK_TEXT_LEN`] wins.
pub const CONTAINER_STRATEGIES: &[ContainerStrategy] = &[
    // 2026 desktop layout: review column inside the gMdEY7 wrapper.
    ContainerStrategy {
        name: "review-column",
        css: "div.gMdEY7 div.col",
    },
    // Any column that contains a rating badge (new or classic class).
    ContainerStrategy {
        name: "rating-anchored",
        css: "div.col:has(div.MKiFS6), div.col:has(div._3LWZlK)",
    },
    // Classic layout.
    ContainerStrategy {
        name: "classic",
        css: "div._2wzgFH",
    },
    // Mobile/responsive layout.
    ContainerStrategy {
        name: "responsive",
        css: "div.cPHDOP",
    },
];

/// Reviewer-name fallback chain (new layout first, then classic).
pub const NAME_CHAIN: &[&str] = &["p.ZDi3w2", "p._2V5EHH"];

/// Rating badge fallback chain.
pub const RATING_CHAIN: &[&str] = &["div.MKiFS6", "div._3LWZlK"];

/// Review-title fallback chain.
pub const TITLE_CHAIN: &[&str] = &["p.qW2QI1", "p._2-N8zT"];

/// Review-body fallback chain.
pub const BODY_CHAIN: &[&str] = &["div.G4PxIA div", "div.t-ZTKy"];

/// Date-candidate chain. These classes are shared with other footer text
/// (the reviewer name reuses `zJ1ZGa`), so candidates are filtered by the
/// extractor's date heuristic rather than trusted blindly.
pub const DATE_CHAIN: &[&str] = &["p.zJ1ZGa", "p._2sc7ZR"];

/// Combined rating-badge probe used by infinite-scroll advancement to count
/// loaded reviews before and after a scroll.
pub const RATING_PROBE: &str = "div.MKiFS6, div._3LWZlK";

/// "Next" pagination control. Matched by label because the anchor classes
/// rotate between layouts and the same class is used for "Previous".
pub const NEXT_CONTROL: &[Locator] = &[
    Locator {
        css: "nav a span",
        text_all: &["Next"],
    },
    Locator {
        css: "nav a._1LKTO3",
        text_all: &["Next"],
    },
    Locator {
        css: "a span",
        text_all: &["Next"],
    },
];

/// Entry points from a product page to the all-reviews view.
pub const ALL_REVIEWS_ENTRY: &[Locator] = &[
    Locator {
        css: "div._3UAT2v._16PBlm",
        text_all: &[],
    },
    Locator {
        css: "a[href*='/product-reviews/']",
        text_all: &[],
    },
    Locator {
        css: "div span",
        text_all: &["All", "reviews"],
    },
];

/// Close control of the login popup that covers freshly opened product pages.
pub const LOGIN_POPUP_CLOSE: &[Locator] = &[Locator {
    css: "div._30XB9F, button._2KpZ6l",
    text_all: &[],
}];

/// Validate that `raw` parses as an http(s) URL on the flipkart.com domain.
#[must_use]
pub fn is_product_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    match url.host_str() {
        Some(host) => host == "flipkart.com" || host.ends_with(".flipkart.com"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_flipkart_product_urls() {
        assert!(is_product_url("https://www.flipkart.com/some-phone/p/itm123"));
        assert!(is_product_url(
            "https://www.flipkart.com/some-phone/product-reviews/itm123"
        ));
        assert!(is_product_url("http://flipkart.com/x/p/y"));
    }

    #[test]
    fn rejects_foreign_and_malformed_urls() {
        assert!(!is_product_url("https://www.amazon.in/dp/B000"));
        assert!(!is_product_url("https://notflipkart.com/p/x"));
        assert!(!is_product_url("https://evil.com/flipkart.com/p/x"));
        assert!(!is_product_url("ftp://www.flipkart.com/p/x"));
        assert!(!is_product_url("not a url"));
    }

    #[test]
    fn locator_text_filter() {
        let loc = Locator {
            css: "div span",
            text_all: &["All", "reviews"],
        };
        assert!(loc.matches_text("All 4,132 reviews"));
        assert!(!loc.matches_text("All offers"));
        let unconditional = Locator {
            css: "div",
            text_all: &[],
        };
        assert!(unconditional.matches_text("anything"));
    }
}
