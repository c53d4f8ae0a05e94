//! Review date resolution and range filtering.
//!
//! Flipkart renders dates in several shapes: "Today", "5 days ago",
//! "10 months ago", "Oct, 2023", "20 Jan 2024". Rules are tried in a fixed
//! order; anything else is unresolved and unresolved dates are always
//! dropped by the range filter; that is policy, not an accident.

use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Days subtracted per month for "N months ago" strings.
///
/// A flat 30-day approximation, matching the site-observed behavior the
/// downstream range filter was tuned against. Deliberately not
/// calendar-month arithmetic.
pub const DAYS_PER_MONTH_APPROX: u64 = 30;

static FIRST_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").expect("valid literal regex"));

fn first_int(raw: &str) -> Option<u64> {
    FIRST_INT.captures(raw)?.get(1)?.as_str().parse().ok()
}

/// Resolve a raw review date string against a reference date.
///
/// `today` is injected rather than read from the clock so relative dates are
/// deterministic under test. Returns `None` for unresolvable strings.
#[must_use]
pub fn parse_review_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_lowercase();

    if lower.contains("today") {
        return Some(today);
    }
    if lower.contains("days ago") {
        let days = first_int(&lower)?;
        return today.checked_sub_days(Days::new(days));
    }
    if lower.contains("month ago") || lower.contains("months ago") {
        let months = first_int(&lower)?;
        return today.checked_sub_days(Days::new(months * DAYS_PER_MONTH_APPROX));
    }

    // "Oct, 2023" carries no day; first-of-month semantics for range checks.
    if raw.contains(',')
        && let Ok(date) = NaiveDate::parse_from_str(&format!("1 {raw}"), "%d %b, %Y")
    {
        return Some(date);
    }

    // "20 Jan 2024"
    NaiveDate::parse_from_str(raw, "%d %b %Y").ok()
}

/// Inclusive range check; both boundary dates are retained.
#[must_use]
pub fn in_range(date: NaiveDate, from: NaiveDate, to: NaiveDate) -> bool {
    from <= date && date <= to
}
