//! Duplicate title detection.
//!
//! This module provides:
//! - Case-insensitive duplicate detection in linear time ([`find_duplicates`])
//! - The pairwise baseline it replaces ([`find_duplicates_naive`])
//! - The [`DuplicateSet`] result type and the [`CasePolicy`] that decides
//!   which literal forms represent a repeated title

pub mod detector;
pub mod set;

pub use detector::{detect_duplicates, find_duplicates, find_duplicates_naive, normalize};
pub use set::{DuplicateSet, DuplicateTitle};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which literal forms of a repeated title end up in the result.
///
/// Titles are grouped by their case-folded form, so `"Alien"` and `"alien"`
/// share one key. The policy decides how that key is represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CasePolicy {
    /// One literal per repeated key: the form of its first occurrence.
    #[default]
    Canonical,
    /// Every distinct literal form whose key repeats.
    AllVariants,
}

impl std::fmt::Display for CasePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CasePolicy::Canonical => write!(f, "canonical"),
            CasePolicy::AllVariants => write!(f, "all-variants"),
        }
    }
}

/// Detection algorithm to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Single counting pass plus a filter pass, O(n).
    #[default]
    Optimized,
    /// Pairwise comparison of every title against every other, O(n²).
    Naive,
}

impl Strategy {
    /// Both strategies, baseline first.
    pub const ALL: [Strategy; 2] = [Strategy::Naive, Strategy::Optimized];

    /// Run this strategy over `corpus`.
    #[must_use]
    pub fn detect<S: AsRef<str>>(self, corpus: &[S], policy: CasePolicy) -> DuplicateSet {
        match self {
            Strategy::Optimized => find_duplicates(corpus, policy),
            Strategy::Naive => find_duplicates_naive(corpus, policy),
        }
    }

    /// Name of the entry point, as it appears in timing and profile reports.
    #[must_use]
    pub fn function_name(self) -> &'static str {
        match self {
            Strategy::Optimized => "find_duplicates",
            Strategy::Naive => "find_duplicates_naive",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Optimized => write!(f, "optimized"),
            Strategy::Naive => write!(f, "naive"),
        }
    }
}
