//! Type-safe builder for `ScrapeJob` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that the product URLs and the date range are set before building
//! a `ScrapeJob`.

use chrono::NaiveDate;
use log::warn;
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::{DEFAULT_MAX_ITERATIONS, DEFAULT_OUTPUT_DIR, ScrapeJob};
use crate::error::{HarvestError, HarvestResult};
use crate::site;

// Type states for the builder
pub struct WithUrls;
pub struct Complete;

pub struct ScrapeJobBuilder<State = ()> {
    pub(crate) product_urls: Vec<String>,
    pub(crate) from_date: Option<NaiveDate>,
    pub(crate) to_date: Option<NaiveDate>,
    pub(crate) max_iterations: u32,
    pub(crate) output_dir: PathBuf,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeJobBuilder<()> {
    fn default() -> Self {
        Self {
            product_urls: Vec::new(),
            from_date: None,
            to_date: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            _phantom: PhantomData,
        }
    }
}

impl ScrapeJob {
    /// Create a builder for configuring a `ScrapeJob` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeJobBuilder<()> {
        ScrapeJobBuilder::default()
    }
}

impl ScrapeJobBuilder<()> {
    /// Set the product URLs from a newline-separated submission.
    ///
    /// Blank lines are dropped; entries failing Flipkart domain validation
    /// are dropped with a warning. `build()` fails if nothing survives.
    #[must_use]
    pub fn product_urls(self, raw: &str) -> ScrapeJobBuilder<WithUrls> {
        let urls = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| {
                let valid = site::is_product_url(line);
                if !valid {
                    warn!("Dropping invalid product URL: {line}");
                }
                valid
            })
            .map(ToString::to_string)
            .collect();

        ScrapeJobBuilder {
            product_urls: urls,
            from_date: self.from_date,
            to_date: self.to_date,
            max_iterations: self.max_iterations,
            output_dir: self.output_dir,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeJobBuilder<WithUrls> {
    /// Set the inclusive `[from, to]` date range at day granularity.
    #[must_use]
    pub fn date_range(self, from: NaiveDate, to: NaiveDate) -> ScrapeJobBuilder<Complete> {
        ScrapeJobBuilder {
            product_urls: self.product_urls,
            from_date: Some(from),
            to_date: Some(to),
            max_iterations: self.max_iterations,
            output_dir: self.output_dir,
            _phantom: PhantomData,
        }
    }
}

// Methods available for all states
impl<State> ScrapeJobBuilder<State> {
    /// Set the per-product iteration cap (button pages or scroll passes).
    #[must_use]
    pub fn max_iterations(mut self, cap: u32) -> Self {
        self.max_iterations = cap;
        self
    }

    /// Set the output directory for the dataset and spreadsheet files.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

impl ScrapeJobBuilder<Complete> {
    /// Validate and build the immutable job.
    ///
    /// Output file names are derived from the build timestamp:
    /// `reviews_<YYYYmmdd_HHMMSS>.csv` and `.xlsx` under the output
    /// directory. The directory itself is created later, on first use.
    pub fn build(self) -> HarvestResult<ScrapeJob> {
        if self.product_urls.is_empty() {
            return Err(HarvestError::NoValidUrls);
        }

        let (from, to) = match (self.from_date, self.to_date) {
            (Some(f), Some(t)) => (f, t),
            // Unreachable by construction: the Complete state requires
            // date_range() to have run.
            _ => return Err(HarvestError::NoValidUrls),
        };
        if from > to {
            return Err(HarvestError::InvalidDateRange { from, to });
        }

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let csv_path = self.output_dir.join(format!("reviews_{timestamp}.csv"));
        let xlsx_path = self.output_dir.join(format!("reviews_{timestamp}.xlsx"));

        Ok(ScrapeJob {
            product_urls: self.product_urls,
            from_date: from,
            to_date: to,
            max_iterations: self.max_iterations,
            output_dir: self.output_dir,
            csv_path,
            xlsx_path,
        })
    }
}
