//! Human-readable report: a count line followed by one title per line.

use std::io;

use yansi::Paint;

use super::{OutputError, RunSummary};
use crate::duplicates::DuplicateSet;

/// Plain text formatter.
pub struct TextOutput<'a> {
    duplicates: &'a DuplicateSet,
    summary: &'a RunSummary,
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter.
    #[must_use]
    pub fn new(duplicates: &'a DuplicateSet, summary: &'a RunSummary) -> Self {
        Self {
            duplicates,
            summary,
        }
    }

    /// Write the report.
    ///
    /// The header is bold unless colouring was disabled with
    /// `yansi::disable()`.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` if writing fails.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> Result<(), OutputError> {
        let header = format!("Found {} duplicate movies:", self.duplicates.len());
        writeln!(writer, "{}", header.bold())?;
        for entry in self.duplicates {
            writeln!(writer, "{}", entry.title)?;
        }
        log::debug!(
            "{} of {} titles from {} are duplicates ({} strategy, {:?})",
            self.duplicates.len(),
            self.summary.total_titles,
            self.summary.source,
            self.summary.strategy,
            self.summary.detection_duration
        );
        Ok(())
    }
}
