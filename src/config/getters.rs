//! Getter methods for `ScrapeJob`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `ScrapeJob` instance.

use chrono::NaiveDate;
use std::path::Path;

use super::types::ScrapeJob;

impl ScrapeJob {
    #[must_use]
    pub fn product_urls(&self) -> &[String] {
        &self.product_urls
    }

    #[must_use]
    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    #[must_use]
    pub fn to_date(&self) -> NaiveDate {
        self.to_date
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    #[must_use]
    pub fn xlsx_path(&self) -> &Path {
        &self.xlsx_path
    }
}
