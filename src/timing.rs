//! Repeated wall-clock measurement of a callable.
//!
//! [`Timer`] runs a closure `runs_per_repeat` times in a row, `repeats`
//! times over, and keeps the total of each repeat. The fastest repeat is the
//! figure to compare: slower repeats mostly measure interference from the
//! rest of the system.
//!
//! # Example
//!
//! ```
//! use titledupe::duplicates::detect_duplicates;
//! use titledupe::timing::Timer;
//!
//! let corpus = vec!["Heat", "heat", "Up"];
//! let timer = Timer::new().with_repeats(3).with_runs_per_repeat(10);
//! let measurement = timer.measure("detect_duplicates", || detect_duplicates(&corpus));
//!
//! assert_eq!(measurement.samples.len(), 3);
//! assert!(measurement.best_per_run() <= measurement.best);
//! ```

use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Repeat settings for a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    repeats: usize,
    runs_per_repeat: usize,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            repeats: 3,
            runs_per_repeat: 1,
        }
    }
}

impl Timer {
    /// Create a timer with the default settings (3 repeats of 1 run).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of repeats (at least 1).
    #[must_use]
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats.max(1);
        self
    }

    /// Set the number of runs inside each repeat (at least 1).
    #[must_use]
    pub fn with_runs_per_repeat(mut self, runs: usize) -> Self {
        self.runs_per_repeat = runs.max(1);
        self
    }

    /// Number of repeats.
    #[must_use]
    pub fn repeats(&self) -> usize {
        self.repeats
    }

    /// Number of runs in each repeat.
    #[must_use]
    pub fn runs_per_repeat(&self) -> usize {
        self.runs_per_repeat
    }

    /// Time `f` and label the result.
    ///
    /// Return values go through [`black_box`] so the optimizer cannot drop
    /// the work being measured.
    pub fn measure<R>(&self, label: &str, mut f: impl FnMut() -> R) -> Measurement {
        let mut samples = Vec::with_capacity(self.repeats);

        for repeat in 0..self.repeats {
            let start = Instant::now();
            for _ in 0..self.runs_per_repeat {
                black_box(f());
            }
            let elapsed = start.elapsed();
            log::trace!("{} repeat {}: {:?}", label, repeat + 1, elapsed);
            samples.push(elapsed);
        }

        let best = samples.iter().min().copied().unwrap_or_default();
        Measurement {
            label: label.to_string(),
            repeats: self.repeats,
            runs_per_repeat: self.runs_per_repeat,
            samples,
            best,
        }
    }
}

/// Measure `f` and return the fastest observed time for a single run.
pub fn measure<R>(f: impl FnMut() -> R, repeats: usize, runs_per_repeat: usize) -> Duration {
    Timer::new()
        .with_repeats(repeats)
        .with_runs_per_repeat(runs_per_repeat)
        .measure("measure", f)
        .best_per_run()
}

/// Outcome of [`Timer::measure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Name of the measured callable
    pub label: String,
    /// Number of repeats performed
    pub repeats: usize,
    /// Runs inside each repeat
    pub runs_per_repeat: usize,
    /// Total time of each repeat, in order
    pub samples: Vec<Duration>,
    /// Fastest repeat
    pub best: Duration,
}

impl Measurement {
    /// Fastest observed time for a single run.
    #[must_use]
    pub fn best_per_run(&self) -> Duration {
        let runs = u32::try_from(self.runs_per_repeat.max(1)).unwrap_or(u32::MAX);
        self.best / runs
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "func={}  num_repeats={} runs_per_repeat={} time_cost={:.3} sec",
            self.label,
            self.repeats,
            self.runs_per_repeat,
            self.best_per_run().as_secs_f64()
        )
    }
}
