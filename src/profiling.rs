//! Step-level profiling of a callable.
//!
//! A [`Profiler`] runs a closure inside a profiling session and produces a
//! [`ProfileReport`] ranking the instrumented steps by cumulative time.
//! Code marks its steps with [`step`]; outside a session `step` simply calls
//! the closure, so instrumented code pays one thread-local lookup per step.
//!
//! Sessions are stored per thread. Callers on other threads never see each
//! other's steps, and a session opened inside another one is reported on its
//! own and then hands control back to the outer session.
//!
//! # Example
//!
//! ```
//! use titledupe::profiling::{step, Profiler};
//!
//! let profiler = Profiler::new(5);
//! let (sum, report) = profiler.run("sum", || {
//!     (0..100u64).map(|n| step("square", || n * n)).sum::<u64>()
//! });
//!
//! assert_eq!(sum, 328_350);
//! assert_eq!(report.entries[0].name, "square");
//! assert_eq!(report.entries[0].calls, 100);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Default number of steps kept in a report.
pub const DEFAULT_TOP_N: usize = 10;

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

/// Calls and time recorded for one named step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StepStats {
    calls: u64,
    cumulative: Duration,
}

#[derive(Debug, Default)]
struct Session {
    steps: HashMap<&'static str, StepStats>,
}

impl Session {
    fn record(&mut self, name: &'static str, elapsed: Duration) {
        let stats = self.steps.entry(name).or_default();
        stats.calls += 1;
        stats.cumulative += elapsed;
    }
}

/// Check if a profiling session is open on this thread.
#[must_use]
pub fn is_active() -> bool {
    SESSION.with(|s| s.borrow().is_some())
}

/// Run `f` as the named step of the current profiling session.
///
/// Time is measured inclusively, so a step's cumulative time covers the
/// steps nested inside it. Without an open session this only calls `f`.
pub fn step<R>(name: &'static str, f: impl FnOnce() -> R) -> R {
    if !is_active() {
        return f();
    }

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    SESSION.with(|s| {
        if let Some(session) = s.borrow_mut().as_mut() {
            session.record(name, elapsed);
        }
    });
    result
}

/// Restores the enclosing session when a profiled closure finishes or panics.
struct SessionGuard {
    outer: Option<Option<Session>>,
}

impl SessionGuard {
    fn open() -> Self {
        let outer = SESSION.with(|s| s.replace(Some(Session::default())));
        Self { outer: Some(outer) }
    }

    fn close(mut self) -> Session {
        let outer = self.outer.take().unwrap_or_default();
        SESSION
            .with(|s| s.replace(outer))
            .unwrap_or_default()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(outer) = self.outer.take() {
            SESSION.with(|s| s.replace(outer));
        }
    }
}

/// Wraps callables so that running them produces a ranked step report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profiler {
    top_n: usize,
}

impl Default for Profiler {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl Profiler {
    /// Create a profiler that reports the `top_n` most expensive steps.
    ///
    /// A `top_n` of zero is raised to one.
    #[must_use]
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n: top_n.max(1),
        }
    }

    /// Number of steps kept in reports.
    #[must_use]
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Run `f` in a fresh session and return its result with the report.
    pub fn run<R>(&self, label: &str, f: impl FnOnce() -> R) -> (R, ProfileReport) {
        let guard = SessionGuard::open();
        let start = Instant::now();
        let result = f();
        let total = start.elapsed();
        let session = guard.close();

        let report = ProfileReport::build(label, total, session, self.top_n);
        log::debug!(
            "Profiled {}: {} steps, {} calls in {:?}",
            label,
            report.entries.len() + report.omitted,
            report.total_calls,
            total
        );
        (result, report)
    }

    /// Wrap `f` so that every invocation is profiled and the report is
    /// printed to stdout before the result is returned.
    pub fn wrap<A, R, F>(&self, label: impl Into<String>, f: F) -> impl Fn(A) -> R
    where
        F: Fn(A) -> R,
    {
        let profiler = *self;
        let label = label.into();
        move |arg| {
            let (result, report) = profiler.run(&label, || f(arg));
            println!("{report}");
            result
        }
    }
}

/// Wrap `f` with a default [`Profiler`]; see [`Profiler::wrap`].
pub fn profile<A, R, F>(label: impl Into<String>, f: F) -> impl Fn(A) -> R
where
    F: Fn(A) -> R,
{
    Profiler::default().wrap(label, f)
}

/// One ranked line of a [`ProfileReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    /// Step name
    pub name: &'static str,
    /// Number of times the step ran
    pub calls: u64,
    /// Total time across all calls, including nested steps
    pub cumulative: Duration,
}

impl ProfileEntry {
    /// Average time per call.
    #[must_use]
    pub fn per_call(&self) -> Duration {
        match u32::try_from(self.calls) {
            Ok(0) => Duration::ZERO,
            Ok(calls) => self.cumulative / calls,
            Err(_) => Duration::from_secs_f64(self.cumulative.as_secs_f64() / self.calls as f64),
        }
    }
}

/// Steps of one profiled run, most expensive first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileReport {
    /// Label of the profiled callable
    pub label: String,
    /// Wall time of the whole run
    pub total: Duration,
    /// Calls recorded across all steps, including omitted ones
    pub total_calls: u64,
    /// Top steps by cumulative time
    pub entries: Vec<ProfileEntry>,
    /// Number of steps cut by the top-N limit
    pub omitted: usize,
}

impl ProfileReport {
    fn build(label: &str, total: Duration, session: Session, top_n: usize) -> Self {
        let mut entries: Vec<ProfileEntry> = session
            .steps
            .into_iter()
            .map(|(name, stats)| ProfileEntry {
                name,
                calls: stats.calls,
                cumulative: stats.cumulative,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.cumulative
                .cmp(&a.cumulative)
                .then_with(|| a.name.cmp(b.name))
        });

        let total_calls = entries.iter().map(|e| e.calls).sum();
        let omitted = entries.len().saturating_sub(top_n);
        entries.truncate(top_n);

        Self {
            label: label.to_string(),
            total,
            total_calls,
            entries,
            omitted,
        }
    }

    /// Look up a ranked step by name.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&ProfileEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} calls in {:.3} seconds ({})",
            self.total_calls,
            self.total.as_secs_f64(),
            self.label
        )?;
        writeln!(f)?;
        writeln!(f, "   Ordered by: cumulative time")?;
        if self.omitted > 0 {
            writeln!(
                f,
                "   List reduced from {} to {} due to restriction",
                self.entries.len() + self.omitted,
                self.entries.len()
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>10} {:>10} {:>10}  step",
            "ncalls", "cumtime", "percall"
        )?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:>10} {:>10.6} {:>10.6}  {}",
                entry.calls,
                entry.cumulative.as_secs_f64(),
                entry.per_call().as_secs_f64(),
                entry.name
            )?;
        }
        Ok(())
    }
}
