//! The result of duplicate detection.
//!
//! A [`DuplicateSet`] holds each repeated title exactly once, together with
//! its case-folded key and how many corpus entries share that key. Entries
//! keep the order in which they were first seen so reports are stable, but
//! two sets compare equal whenever they hold the same entries.
//!
//! # Example
//!
//! ```
//! use titledupe::duplicates::detect_duplicates;
//!
//! let set = detect_duplicates(&["Cat", "Dog", "cat", "Dog", "Cat"]);
//!
//! assert_eq!(set.len(), 2);
//! assert!(set.contains("Cat"));
//! assert!(set.contains("Dog"));
//! assert_eq!(set.keys().into_iter().collect::<Vec<_>>(), vec!["cat", "dog"]);
//! ```

use std::collections::BTreeSet;

use serde::Serialize;

/// One repeated title.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DuplicateTitle {
    /// Literal form, as it appears in the corpus
    pub title: String,
    /// Case-folded grouping key
    pub normalized: String,
    /// Number of corpus entries sharing the key
    pub occurrences: usize,
}

impl DuplicateTitle {
    /// Create a new entry.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        normalized: impl Into<String>,
        occurrences: usize,
    ) -> Self {
        Self {
            title: title.into(),
            normalized: normalized.into(),
            occurrences,
        }
    }

    /// Number of redundant copies (occurrences minus the one to keep).
    #[must_use]
    pub fn extra_copies(&self) -> usize {
        self.occurrences.saturating_sub(1)
    }
}

/// Titles found more than once in a corpus.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DuplicateSet {
    entries: Vec<DuplicateTitle>,
}

impl DuplicateSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: DuplicateTitle) {
        debug_assert!(entry.occurrences > 1, "{:?} is not a duplicate", entry.title);
        self.entries.push(entry);
    }

    /// Number of titles in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in first-occurrence order.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateTitle> {
        self.entries.iter()
    }

    /// Check if `title` (compared literally) is in the set.
    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.entries.iter().any(|e| e.title == title)
    }

    /// Check if some entry has the given case-folded key.
    #[must_use]
    pub fn contains_key(&self, normalized: &str) -> bool {
        self.entries.iter().any(|e| e.normalized == normalized)
    }

    /// Literal titles in first-occurrence order.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.title.as_str()).collect()
    }

    /// Distinct case-folded keys, sorted.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|e| e.normalized.as_str()).collect()
    }

    /// Total redundant entries across all distinct keys.
    #[must_use]
    pub fn extra_copies(&self) -> usize {
        let mut seen = BTreeSet::new();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.normalized.as_str()))
            .map(DuplicateTitle::extra_copies)
            .sum()
    }

    /// Literal titles, sorted.
    #[must_use]
    pub fn into_sorted_titles(self) -> Vec<String> {
        let mut titles: Vec<String> = self.entries.into_iter().map(|e| e.title).collect();
        titles.sort();
        titles
    }

    fn as_sorted(&self) -> BTreeSet<&DuplicateTitle> {
        self.entries.iter().collect()
    }
}

impl PartialEq for DuplicateSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.as_sorted() == other.as_sorted()
    }
}

impl Eq for DuplicateSet {}

impl<'a> IntoIterator for &'a DuplicateSet {
    type Item = &'a DuplicateTitle;
    type IntoIter = std::slice::Iter<'a, DuplicateTitle>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for DuplicateSet {
    type Item = DuplicateTitle;
    type IntoIter = std::vec::IntoIter<DuplicateTitle>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
