//! Naive versus optimized detection, measured side by side.
//!
//! [`synthetic_corpus`] builds reproducible title lists with a known share of
//! repeats. [`compare`] times both strategies on one corpus, and [`scaling`]
//! times them on two corpus sizes to show how each grows: the optimized
//! detector should grow about as fast as the input, the naive one about as
//! fast as its square.

use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::duplicates::{CasePolicy, Strategy};
use crate::timing::{Measurement, Timer};

const ADJECTIVES: &[&str] = &[
    "Silent", "Crimson", "Last", "Hidden", "Broken", "Golden", "Midnight", "Lost", "Electric",
    "Frozen", "Savage", "Distant", "Hollow", "Burning", "Secret", "Wild",
];

const NOUNS: &[&str] = &[
    "River", "Empire", "Horizon", "Garden", "Station", "Kingdom", "Voyage", "Mirror", "Harbor",
    "Frontier", "Orchard", "Signal", "Citadel", "Lantern", "Canyon", "Echo",
];

/// Build `size` titles in which roughly `duplicate_ratio` of the entries
/// repeat an earlier title, some of them with different letter case.
///
/// The same `seed` always yields the same corpus. `duplicate_ratio` is
/// clamped to `0.0..=1.0`; the first title is always new.
///
/// ```
/// use titledupe::bench::synthetic_corpus;
/// use titledupe::duplicates::detect_duplicates;
///
/// let unique = synthetic_corpus(500, 0.0, 7);
/// assert_eq!(unique.len(), 500);
/// assert!(detect_duplicates(&unique).is_empty());
///
/// assert_eq!(synthetic_corpus(100, 0.2, 7), synthetic_corpus(100, 0.2, 7));
/// ```
#[must_use]
pub fn synthetic_corpus(size: usize, duplicate_ratio: f64, seed: u64) -> Vec<String> {
    let ratio = if duplicate_ratio.is_nan() {
        0.0
    } else {
        duplicate_ratio.clamp(0.0, 1.0)
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let mut corpus: Vec<String> = Vec::with_capacity(size);

    for idx in 0..size {
        if !corpus.is_empty() && rng.gen_bool(ratio) {
            let original = &corpus[rng.gen_range(0..corpus.len())];
            let repeat = match rng.gen_range(0..4) {
                0 => original.to_uppercase(),
                1 => original.to_lowercase(),
                _ => original.clone(),
            };
            corpus.push(repeat);
        } else {
            let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
            let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
            corpus.push(format!("The {adjective} {noun} {}", idx + 1));
        }
    }

    corpus
}

/// Timings of both strategies on the same corpus.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Number of titles measured
    pub size: usize,
    /// Pairwise baseline
    pub naive: Measurement,
    /// Linear detector
    pub optimized: Measurement,
    /// Whether both strategies returned the same set
    pub results_agree: bool,
}

impl Comparison {
    /// How many times faster the optimized detector ran.
    #[must_use]
    pub fn speedup(&self) -> f64 {
        ratio(self.naive.best_per_run(), self.optimized.best_per_run())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.naive)?;
        writeln!(f, "{}", self.optimized)?;
        write!(
            f,
            "{} titles: optimized is {:.1}x faster{}",
            self.size,
            self.speedup(),
            if self.results_agree {
                ""
            } else {
                " (RESULTS DIFFER)"
            }
        )
    }
}

/// Time both strategies on `corpus`.
pub fn compare<S: AsRef<str>>(corpus: &[S], timer: &Timer, policy: CasePolicy) -> Comparison {
    let naive = timer.measure(Strategy::Naive.function_name(), || {
        Strategy::Naive.detect(corpus, policy)
    });
    let optimized = timer.measure(Strategy::Optimized.function_name(), || {
        Strategy::Optimized.detect(corpus, policy)
    });

    let results_agree =
        Strategy::Naive.detect(corpus, policy) == Strategy::Optimized.detect(corpus, policy);
    if !results_agree {
        log::warn!("Naive and optimized detection disagree on {} titles", corpus.len());
    }

    Comparison {
        size: corpus.len(),
        naive,
        optimized,
        results_agree,
    }
}

/// Best single-run time of each strategy at one corpus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingPoint {
    /// Number of titles
    pub size: usize,
    /// Pairwise baseline
    pub naive: Duration,
    /// Linear detector
    pub optimized: Duration,
}

impl ScalingPoint {
    fn time(&self, strategy: Strategy) -> Duration {
        match strategy {
            Strategy::Naive => self.naive,
            Strategy::Optimized => self.optimized,
        }
    }
}

/// Growth of each strategy when the input grows by `factor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingReport {
    /// Measurements at the base size
    pub small: ScalingPoint,
    /// Measurements at `factor` times the base size
    pub large: ScalingPoint,
    /// Size multiplier between the two points
    pub factor: usize,
}

impl ScalingReport {
    /// Time at the large size divided by time at the small size.
    #[must_use]
    pub fn growth(&self, strategy: Strategy) -> f64 {
        ratio(self.large.time(strategy), self.small.time(strategy))
    }

    /// Check if `strategy` grew closer to linearly than quadratically.
    ///
    /// Linear growth gives a ratio near `factor`, quadratic growth near
    /// `factor²`; the cut-off is half of `factor²`.
    #[must_use]
    pub fn looks_linear(&self, strategy: Strategy) -> bool {
        let factor = self.factor as f64;
        self.growth(strategy) < factor * factor / 2.0
    }
}

impl fmt::Display for ScalingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Scaling {} -> {} titles (x{}):",
            self.small.size, self.large.size, self.factor
        )?;
        for strategy in Strategy::ALL {
            writeln!(
                f,
                "  {:<9} {:>10.6} s -> {:>10.6} s  growth x{:.1} ({})",
                strategy.to_string(),
                self.small.time(strategy).as_secs_f64(),
                self.large.time(strategy).as_secs_f64(),
                self.growth(strategy),
                if self.looks_linear(strategy) {
                    "linear"
                } else {
                    "quadratic"
                }
            )?;
        }
        Ok(())
    }
}

/// Measure both strategies on synthetic corpora of `size` and
/// `size * factor` titles.
///
/// `size` and `factor` are raised to at least 1 and 2.
pub fn scaling(
    size: usize,
    factor: usize,
    duplicate_ratio: f64,
    seed: u64,
    timer: &Timer,
    policy: CasePolicy,
) -> ScalingReport {
    let size = size.max(1);
    let factor = factor.max(2);

    let point = |n: usize| {
        let corpus = synthetic_corpus(n, duplicate_ratio, seed);
        let comparison = compare(&corpus, timer, policy);
        log::debug!("{comparison}");
        ScalingPoint {
            size: n,
            naive: comparison.naive.best_per_run(),
            optimized: comparison.optimized.best_per_run(),
        }
    };

    ScalingReport {
        small: point(size),
        large: point(size.saturating_mul(factor)),
        factor,
    }
}

fn ratio(numerator: Duration, denominator: Duration) -> f64 {
    let denominator = denominator.as_secs_f64().max(1e-9);
    numerator.as_secs_f64() / denominator
}
