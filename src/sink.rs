//! Append-only streaming CSV writer.
//!
//! Batches arrive once per extraction pass and are written immediately; the
//! full result set is never held in memory. The header row is written
//! exactly once, only when the destination file does not already exist.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::model::Review;

/// Dataset column order. `review_date` is the resolved date, ISO formatted;
/// `relative_date` is the raw string as rendered on the page.
pub const CSV_COLUMNS: &[&str] = &[
    "platform",
    "reviewer_name",
    "rating",
    "review",
    "review_date",
    "relative_date",
    "product_url",
];

/// Streaming review sink bound to one dataset file.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one batch, creating the file (and its parent directory) on
    /// first use. Flushes before returning; absent fields are written as
    /// empty cells.
    pub fn append(&self, batch: &[Review]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }

        let file_exists = self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open dataset file {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if !file_exists {
            writer
                .write_record(CSV_COLUMNS)
                .context("Failed to write dataset header")?;
        }

        for review in batch {
            writer
                .write_record([
                    review.platform.as_str(),
                    review.reviewer_name.as_str(),
                    &review.rating.to_string(),
                    review.review.as_str(),
                    &review
                        .review_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                    review.relative_date.as_deref().unwrap_or_default(),
                    review.product_url.as_str(),
                ])
                .context("Failed to write review row")?;
        }

        writer.flush().context("Failed to flush dataset file")?;
        debug!("Appended {} rows to {}", batch.len(), self.path.display());
        Ok(())
    }
}
