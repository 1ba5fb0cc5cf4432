//! Reading titles from a line-oriented text file.
//!
//! One line is one title. Line endings (`\n`, `\r\n` or a lone `\r`) are
//! stripped, casing and order are preserved, and blank lines are kept as empty
//! titles. A line ending at the end of the file does not add an extra empty
//! title.
//!
//! # Example
//!
//! ```
//! use titledupe::source::parse_lines;
//!
//! let titles = parse_lines("Alien\r\nHeat\n\nUp\n");
//! assert_eq!(titles, vec!["Alien", "Heat", "", "Up"]);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::profiling;

/// Errors that can occur while reading a title file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The provided path does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// The provided path exists but is not a regular file.
    #[error("Not a file: {0}")]
    NotAFile(PathBuf),

    /// The file could not be read, or is not valid UTF-8.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            SourceError::NotFound(path) | SourceError::NotAFile(path) => path,
            SourceError::Io { path, .. } => path,
        }
    }
}

/// Read every line of `path` as a title.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] if the path does not exist,
/// [`SourceError::NotAFile`] if it names a directory, and
/// [`SourceError::Io`] for any other read failure including invalid UTF-8.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>, SourceError> {
    let path = path.as_ref();
    profiling::step("read_lines", || {
        log::info!("Reading file: {}", path.display());

        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
            _ => SourceError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        if !metadata.is_file() {
            return Err(SourceError::NotAFile(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let titles = parse_lines(&content);
        log::debug!("Read {} titles from {}", titles.len(), path.display());
        Ok(titles)
    })
}

/// Split text into titles, one per line.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A terminator at the very
/// end of `content` does not start another (empty) title.
#[must_use]
pub fn parse_lines(content: &str) -> Vec<String> {
    let mut titles = Vec::new();
    let mut rest = content;

    while !rest.is_empty() {
        let Some(end) = rest.find(['\r', '\n']) else {
            titles.push(rest.to_string());
            break;
        };
        titles.push(rest[..end].to_string());
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
    }

    titles
}
