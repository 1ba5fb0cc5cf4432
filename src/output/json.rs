//! JSON output formatter for duplicate detection results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "source": "movies.txt",
//!   "generated_at": "2026-01-01T00:00:00+00:00",
//!   "strategy": "optimized",
//!   "policy": "canonical",
//!   "total_titles": 5,
//!   "duplicate_count": 2,
//!   "extra_copies": 3,
//!   "detection_duration_ms": 0,
//!   "duplicates": [
//!     { "title": "Cat", "normalized": "cat", "occurrences": 3 },
//!     { "title": "Dog", "normalized": "dog", "occurrences": 2 }
//!   ]
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{OutputError, RunSummary};
use crate::duplicates::{CasePolicy, DuplicateSet, Strategy};

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Where the titles came from
    pub source: &'a str,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Detection algorithm
    pub strategy: Strategy,
    /// Case policy
    pub policy: CasePolicy,
    /// Number of titles read
    pub total_titles: usize,
    /// Number of entries in `duplicates`
    pub duplicate_count: usize,
    /// Redundant titles that could be removed
    pub extra_copies: usize,
    /// Detection time in milliseconds
    pub detection_duration_ms: u64,
    /// The repeated titles
    pub duplicates: &'a DuplicateSet,
}

impl<'a> JsonOutput<'a> {
    /// Create a new JSON output.
    ///
    /// # Example
    ///
    /// ```
    /// use titledupe::duplicates::{detect_duplicates, CasePolicy, Strategy};
    /// use titledupe::output::{JsonOutput, RunSummary};
    ///
    /// let set = detect_duplicates(&["Heat", "heat"]);
    /// let summary = RunSummary::new("list", 2, Strategy::Optimized, CasePolicy::Canonical);
    ///
    /// let output = JsonOutput::new(&set, &summary);
    /// assert_eq!(output.duplicate_count, 1);
    /// assert!(output.to_json().unwrap().contains("\"normalized\":\"heat\""));
    /// ```
    #[must_use]
    pub fn new(duplicates: &'a DuplicateSet, summary: &'a RunSummary) -> Self {
        Self {
            source: &summary.source,
            generated_at: Utc::now(),
            strategy: summary.strategy,
            policy: summary.policy,
            total_titles: summary.total_titles,
            duplicate_count: duplicates.len(),
            extra_copies: duplicates.extra_copies(),
            detection_duration_ms: u64::try_from(summary.detection_duration.as_millis())
                .unwrap_or(u64::MAX),
            duplicates,
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns `OutputError` if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), OutputError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}
