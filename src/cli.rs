//! Command-line interface definitions for titledupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, config file) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # List duplicate titles
//! titledupe find movies.txt
//!
//! # Same, as JSON, keeping every spelling of a repeated title
//! titledupe find movies.txt --output json --policy all-variants
//!
//! # Time the naive and optimized detectors against each other
//! titledupe bench movies.txt --repeats 5
//!
//! # Show where the time goes
//! titledupe profile movies.txt --strategy naive --top 5
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::duplicates::{CasePolicy, Strategy};

/// Case-insensitive duplicate title finder.
///
/// Reads a text file with one movie title per line and reports the titles
/// that appear more than once, ignoring letter case. Also measures and
/// profiles the naive pairwise algorithm against the linear one.
#[derive(Debug, Parser)]
#[command(name = "titledupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (TOML); defaults to the platform config directory
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for titledupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List titles that appear more than once
    Find(FindArgs),
    /// Time naive against optimized detection
    Bench(BenchArgs),
    /// Profile one detection run step by step
    Profile(ProfileArgs),
    /// Detect, time and profile both algorithms in one go
    Run(RunArgs),
}

/// Detection options shared by several subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct DetectArgs {
    /// Detection algorithm
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Which spelling(s) of a repeated title to report
    #[arg(long, value_enum)]
    pub policy: Option<CasePolicy>,
}

/// Timing options shared by several subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct TimingArgs {
    /// Number of timed repeats; the fastest one is reported
    #[arg(long, value_name = "N")]
    pub repeats: Option<usize>,

    /// Number of runs inside each repeat
    #[arg(long, value_name = "N")]
    pub runs_per_repeat: Option<usize>,
}

/// Arguments for the find subcommand.
#[derive(Debug, Args)]
pub struct FindArgs {
    /// Text file with one title per line
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    #[command(flatten)]
    pub detect: DetectArgs,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

/// Arguments for the bench subcommand.
#[derive(Debug, Args)]
pub struct BenchArgs {
    /// Text file with one title per line; a synthetic corpus is used if omitted
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Size of the synthetic corpus and base size of the scaling check.
    ///
    /// Not allowed with FILE: the scaling check then starts from the
    /// file's title count, still on synthetic titles.
    #[arg(long, value_name = "N", conflicts_with = "path")]
    pub size: Option<usize>,

    /// Share of synthetic titles that repeat an earlier one (0.0 to 1.0)
    #[arg(long, value_name = "RATIO", value_parser = parse_ratio)]
    pub duplicate_ratio: Option<f64>,

    /// Seed for the synthetic corpus
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Size multiplier for the scaling check
    #[arg(long, value_name = "K")]
    pub scale_factor: Option<usize>,

    /// Skip the scaling check
    #[arg(long)]
    pub no_scaling: bool,

    /// Which spelling(s) of a repeated title to report
    #[arg(long, value_enum)]
    pub policy: Option<CasePolicy>,

    #[command(flatten)]
    pub timing: TimingArgs,
}

/// Arguments for the profile subcommand.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Text file with one title per line
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    #[command(flatten)]
    pub detect: DetectArgs,

    /// Number of steps to list, most expensive first
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

/// Arguments for the run subcommand.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Text file with one title per line
    #[arg(value_name = "FILE", default_value = "movies.txt")]
    pub path: PathBuf,

    /// Which spelling(s) of a repeated title to report
    #[arg(long, value_enum)]
    pub policy: Option<CasePolicy>,

    #[command(flatten)]
    pub timing: TimingArgs,

    /// Number of profile steps to list
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

/// Output format for detection results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Count line followed by one title per line
    #[default]
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a ratio between 0.0 and 1.0 inclusive.
///
/// Accepts plain fractions (`0.25`) and percentages (`25%`).
///
/// # Examples
///
/// ```
/// use titledupe::cli::parse_ratio;
///
/// assert_eq!(parse_ratio("0.25").unwrap(), 0.25);
/// assert_eq!(parse_ratio("25%").unwrap(), 0.25);
/// assert!(parse_ratio("1.5").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, not a number, or outside the
/// range.
pub fn parse_ratio(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Ratio cannot be empty".to_string());
    }

    let (num_str, scale) = match s.strip_suffix('%') {
        Some(num) => (num.trim(), 100.0),
        None => (s, 1.0),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;
    let ratio = num / scale;

    if !(0.0..=1.0).contains(&ratio) {
        return Err(format!("Ratio must be between 0 and 1 (or 0% and 100%), got '{s}'"));
    }
    Ok(ratio)
}
