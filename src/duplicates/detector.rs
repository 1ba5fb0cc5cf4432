//! Case-insensitive duplicate detection.
//!
//! # Overview
//!
//! [`find_duplicates`] runs in two linear passes:
//! 1. **Count**: case-fold every title and count occurrences per key
//! 2. **Select**: keep the titles whose key was counted more than once
//!
//! [`find_duplicates_naive`] compares every title against every other title,
//! lowercasing both sides on each comparison. It returns the same set and is
//! kept as the baseline that the timing and profiling harnesses measure
//! against.
//!
//! # Example
//!
//! ```
//! use titledupe::duplicates::{find_duplicates, find_duplicates_naive, CasePolicy};
//!
//! let corpus = vec!["Alien", "Heat", "alien", "Up"];
//!
//! let fast = find_duplicates(&corpus, CasePolicy::Canonical);
//! let slow = find_duplicates_naive(&corpus, CasePolicy::Canonical);
//!
//! assert_eq!(fast, slow);
//! assert_eq!(fast.titles(), vec!["Alien"]);
//! ```

use std::collections::{HashMap, HashSet};

use super::{CasePolicy, DuplicateSet, DuplicateTitle};
use crate::profiling;

/// Case-fold a title into its grouping key.
///
/// ```
/// use titledupe::duplicates::normalize;
///
/// assert_eq!(normalize("The Matrix"), "the matrix");
/// assert_eq!(normalize("AMÉLIE"), "amélie");
/// ```
#[must_use]
pub fn normalize(title: &str) -> String {
    title.to_lowercase()
}

/// Find repeated titles using the default [`CasePolicy`].
#[must_use]
pub fn detect_duplicates<S: AsRef<str>>(corpus: &[S]) -> DuplicateSet {
    find_duplicates(corpus, CasePolicy::default())
}

/// Find repeated titles in linear time.
///
/// Every title is case-folded once. Occurrences are counted per key in a
/// single pass, then a second pass keeps the titles whose key occurs more
/// than once, honouring `policy` for keys with several literal forms.
///
/// # Performance
///
/// - Time complexity: O(n) in the number of titles
/// - Space complexity: O(n) for the keys and the count table
#[must_use]
pub fn find_duplicates<S: AsRef<str>>(corpus: &[S], policy: CasePolicy) -> DuplicateSet {
    profiling::step("find_duplicates", || {
        let keys = profiling::step("normalize_keys", || normalize_keys(corpus));
        let counts = profiling::step("count_keys", || count_keys(&keys));
        let set = profiling::step("select_duplicates", || {
            select_duplicates(corpus, &keys, &counts, policy)
        });

        log::debug!(
            "{} titles, {} distinct keys, {} duplicates ({} policy)",
            corpus.len(),
            counts.len(),
            set.len(),
            policy
        );
        set
    })
}

fn normalize_keys<S: AsRef<str>>(corpus: &[S]) -> Vec<String> {
    corpus.iter().map(|title| normalize(title.as_ref())).collect()
}

fn count_keys(keys: &[String]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::with_capacity(keys.len());
    for key in keys {
        *counts.entry(key.as_str()).or_insert(0) += 1;
    }
    counts
}

fn select_duplicates<S: AsRef<str>>(
    corpus: &[S],
    keys: &[String],
    counts: &HashMap<&str, usize>,
    policy: CasePolicy,
) -> DuplicateSet {
    let mut set = DuplicateSet::new();
    // Holds keys under Canonical, literal titles under AllVariants
    let mut emitted: HashSet<&str> = HashSet::new();

    for (title, key) in corpus.iter().zip(keys) {
        let title = title.as_ref();
        let occurrences = counts.get(key.as_str()).copied().unwrap_or(0);
        if occurrences < 2 {
            continue;
        }

        let first = match policy {
            CasePolicy::Canonical => emitted.insert(key.as_str()),
            CasePolicy::AllVariants => emitted.insert(title),
        };
        if first {
            log::trace!("Duplicate {:?} ({} occurrences)", title, occurrences);
            set.push(DuplicateTitle::new(title, key.as_str(), occurrences));
        }
    }

    set
}

/// Find repeated titles by comparing every pair.
///
/// Each title is checked against every other title in the corpus, lowercasing
/// both sides of every comparison. The result equals that of
/// [`find_duplicates`] for the same `policy`.
///
/// # Performance
///
/// - Time complexity: O(n²) comparisons, each allocating two lowercase copies
/// - Meant for measurement only
#[must_use]
pub fn find_duplicates_naive<S: AsRef<str>>(corpus: &[S], policy: CasePolicy) -> DuplicateSet {
    profiling::step("find_duplicates_naive", || {
        let mut set = DuplicateSet::new();

        for (idx, title) in corpus.iter().enumerate() {
            let title = title.as_ref();
            let matches = profiling::step("is_duplicate", || count_matches(idx, title, corpus));
            if matches == 0 {
                continue;
            }

            let key = normalize(title);
            let already_listed = match policy {
                CasePolicy::Canonical => set.contains_key(&key),
                CasePolicy::AllVariants => set.contains(title),
            };
            if !already_listed {
                set.push(DuplicateTitle::new(title, key, matches + 1));
            }
        }

        log::debug!(
            "{} titles, {} duplicates ({} policy, pairwise scan)",
            corpus.len(),
            set.len(),
            policy
        );
        set
    })
}

/// Count the other entries equal to `title` ignoring case.
fn count_matches<S: AsRef<str>>(idx: usize, title: &str, corpus: &[S]) -> usize {
    corpus
        .iter()
        .enumerate()
        .filter(|&(other_idx, other)| {
            other_idx != idx && other.as_ref().to_lowercase() == title.to_lowercase()
        })
        .count()
}
