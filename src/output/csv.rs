//! CSV output formatter for duplicate detection results.
//!
//! One row is generated for each repeated title.
//!
//! # Columns
//!
//! - `title`: Title as it appears in the source
//! - `normalized`: Case-folded grouping key
//! - `occurrences`: Number of source lines sharing the key

use std::io;

use serde::Serialize;

use super::OutputError;
use crate::duplicates::DuplicateSet;

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    normalized: &'a str,
    occurrences: usize,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    duplicates: &'a DuplicateSet,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(duplicates: &'a DuplicateSet) -> Self {
        Self { duplicates }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `OutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), OutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        if self.duplicates.is_empty() {
            csv_writer.write_record(["title", "normalized", "occurrences"])?;
        }
        for entry in self.duplicates {
            csv_writer.serialize(CsvRow {
                title: &entry.title,
                normalized: &entry.normalized,
                occurrences: entry.occurrences,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `OutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, OutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
