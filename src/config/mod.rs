//! Configuration module for review harvesting jobs
//!
//! This module provides the `ScrapeJob` struct and its type-safe builder
//! for configuring harvest runs with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, ScrapeJobBuilder, WithUrls};
pub use types::{DEFAULT_MAX_ITERATIONS, DEFAULT_OUTPUT_DIR, ScrapeJob};
