//! Output formatters for duplicate detection results.
//!
//! This module provides different output formats:
//! - Plain text for people at a terminal
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```
//! use titledupe::duplicates::{detect_duplicates, CasePolicy, Strategy};
//! use titledupe::output::{RunSummary, TextOutput};
//!
//! let corpus = vec!["Heat", "Up", "heat"];
//! let duplicates = detect_duplicates(&corpus);
//! let summary = RunSummary::new(
//!     "movies.txt",
//!     corpus.len(),
//!     Strategy::Optimized,
//!     CasePolicy::Canonical,
//! );
//!
//! yansi::disable();
//! let mut out = Vec::new();
//! TextOutput::new(&duplicates, &summary).write_to(&mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("Found 1 duplicate movies:"));
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::duplicates::{CasePolicy, Strategy};

// Re-export main types
pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::text::TextOutput;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum OutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// Error during JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Facts about one detection run that every report format shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Where the titles came from (a path, or a description)
    pub source: String,
    /// Number of titles read
    pub total_titles: usize,
    /// Algorithm that produced the result
    pub strategy: Strategy,
    /// Case policy that produced the result
    pub policy: CasePolicy,
    /// Wall time of detection alone
    pub detection_duration: Duration,
}

impl RunSummary {
    /// Create a summary with a zero detection time.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        total_titles: usize,
        strategy: Strategy,
        policy: CasePolicy,
    ) -> Self {
        Self {
            source: source.into(),
            total_titles,
            strategy,
            policy,
            detection_duration: Duration::ZERO,
        }
    }

    /// Record how long detection took.
    #[must_use]
    pub fn with_detection_duration(mut self, duration: Duration) -> Self {
        self.detection_duration = duration;
        self
    }
}
