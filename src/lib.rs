//! titledupe - Case-Insensitive Duplicate Title Finder
//!
//! Reads a list of movie titles, one per line, and reports the titles that
//! occur more than once ignoring letter case. Alongside the linear-time
//! detector it keeps the quadratic pairwise baseline, plus the timing and
//! profiling harnesses used to compare the two.

pub mod bench;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod profiling;
pub mod source;
pub mod timing;

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::cli::{BenchArgs, Cli, Commands, FindArgs, OutputFormat, ProfileArgs, RunArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateSet, Strategy};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, RunSummary, TextOutput};

/// Run the application: set up logging and colour, then execute the
/// subcommand with stdout as the report destination.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the input cannot be
/// read, or the report cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    log::debug!(
        "titledupe {} (log level {})",
        env!("CARGO_PKG_VERSION"),
        logging::current_level_name()
    );

    let stdout = io::stdout();
    if !stdout.is_terminal() {
        yansi::disable();
    }
    let mut out = stdout.lock();
    run_with_writer(cli, &mut out)
}

/// Execute the subcommand, writing reports to `out`.
///
/// # Errors
///
/// Same as [`run_app`].
pub fn run_with_writer<W: Write>(cli: Cli, out: &mut W) -> Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match &cli.command {
        Commands::Find(args) => {
            config.merge_find_args(args);
            run_find(args, &config, out)
        }
        Commands::Bench(args) => {
            config.merge_bench_args(args);
            config.validate()?;
            run_bench(args, &config, out)
        }
        Commands::Profile(args) => {
            config.merge_profile_args(args);
            run_profile(args, &config, out)
        }
        Commands::Run(args) => {
            config.merge_run_args(args);
            run_demo(args, &config, out)
        }
    }
}

fn read_corpus(path: &Path) -> Result<Vec<String>> {
    source::read_lines(path)
        .with_context(|| format!("Failed to read titles from {}", path.display()))
}

fn run_find<W: Write>(args: &FindArgs, config: &Config, out: &mut W) -> Result<ExitCode> {
    let corpus = read_corpus(&args.path)?;

    let start = Instant::now();
    let duplicates = config.strategy.detect(&corpus, config.policy);
    let summary = RunSummary::new(
        args.path.display().to_string(),
        corpus.len(),
        config.strategy,
        config.policy,
    )
    .with_detection_duration(start.elapsed());

    log::info!(
        "Detection complete: {} titles → {} duplicates in {:?}",
        summary.total_titles,
        duplicates.len(),
        summary.detection_duration
    );

    write_report(&duplicates, &summary, config.output, out)?;

    Ok(if duplicates.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    })
}

fn write_report<W: Write>(
    duplicates: &DuplicateSet,
    summary: &RunSummary,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Text => TextOutput::new(duplicates, summary).write_to(&mut *out),
        OutputFormat::Json => JsonOutput::new(duplicates, summary).write_to(&mut *out),
        OutputFormat::Csv => CsvOutput::new(duplicates).write_to(&mut *out),
    }
    .context("Failed to write report")
}

fn run_bench<W: Write>(args: &BenchArgs, config: &Config, out: &mut W) -> Result<ExitCode> {
    let timer = config.timer();

    let (corpus, base_size) = match &args.path {
        Some(path) => {
            let corpus = read_corpus(path)?;
            let base = corpus.len().max(1);
            (corpus, base)
        }
        None => {
            log::info!(
                "Generating {} synthetic titles ({:.0}% repeats, seed {})",
                config.bench_size,
                config.duplicate_ratio * 100.0,
                config.seed
            );
            let corpus =
                bench::synthetic_corpus(config.bench_size, config.duplicate_ratio, config.seed);
            (corpus, config.bench_size)
        }
    };

    writeln!(out, "--- Timing, {} titles ---", corpus.len())?;
    let comparison = bench::compare(&corpus, &timer, config.policy);
    writeln!(out, "{comparison}")?;

    if !args.no_scaling {
        config.scaled_size(base_size)?;
        writeln!(out)?;
        writeln!(
            out,
            "--- Scaling, synthetic titles ({:.0}% repeats, seed {}) ---",
            config.duplicate_ratio * 100.0,
            config.seed
        )?;
        let report = bench::scaling(
            base_size,
            config.scale_factor,
            config.duplicate_ratio,
            config.seed,
            &timer,
            config.policy,
        );
        write!(out, "{report}")?;
        if !report.looks_linear(Strategy::Optimized) {
            log::warn!(
                "Optimized detection grew x{:.1} for a x{} larger input",
                report.growth(Strategy::Optimized),
                report.factor
            );
        }
    }

    if comparison.results_agree {
        Ok(ExitCode::Success)
    } else {
        anyhow::bail!("Naive and optimized detection returned different results")
    }
}

fn run_profile<W: Write>(args: &ProfileArgs, config: &Config, out: &mut W) -> Result<ExitCode> {
    let profiler = config.profiler();
    let (result, report) = profiler.run(config.strategy.function_name(), || {
        read_corpus(&args.path).map(|corpus| config.strategy.detect(&corpus, config.policy))
    });
    let duplicates = result?;

    writeln!(out, "Found {} duplicate movies", duplicates.len())?;
    writeln!(out)?;
    write!(out, "{report}")?;
    Ok(ExitCode::Success)
}

/// The full walkthrough: results, timings before and after, profiles
/// before and after.
fn run_demo<W: Write>(args: &RunArgs, config: &Config, out: &mut W) -> Result<ExitCode> {
    let path = args.path.as_path();
    let timer = config.timer();
    let profiler = config.profiler();

    writeln!(out, "--- Before optimization ---")?;
    let corpus = read_corpus(path)?;
    let duplicates = Strategy::Naive.detect(&corpus, config.policy);
    let summary = RunSummary::new(
        path.display().to_string(),
        corpus.len(),
        Strategy::Naive,
        config.policy,
    );
    write_report(&duplicates, &summary, OutputFormat::Text, out)?;

    for (heading, strategy) in [
        ("before", Strategy::Naive),
        ("after", Strategy::Optimized),
    ] {
        writeln!(out)?;
        writeln!(out, "--- Timeit results, {heading} optimization ---")?;
        let measurement = timer.measure(strategy.function_name(), || {
            read_corpus(path).map(|corpus| strategy.detect(&corpus, config.policy))
        });
        writeln!(out, "{measurement}")?;
    }

    for (heading, strategy) in [
        ("before", Strategy::Naive),
        ("after", Strategy::Optimized),
    ] {
        writeln!(out)?;
        writeln!(out, "--- Profile results, {heading} optimization ---")?;
        let (result, report) = profiler.run(strategy.function_name(), || {
            read_corpus(path).map(|corpus| strategy.detect(&corpus, config.policy))
        });
        result?;
        write!(out, "{report}")?;
    }

    writeln!(out)?;
    writeln!(out, "Completed.")?;
    Ok(ExitCode::Success)
}
