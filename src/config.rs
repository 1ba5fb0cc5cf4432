//! Application configuration management.
//!
//! Settings are merged from several layers, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file: `--config <PATH>`, or `config.toml` in the platform
//!    config directory when present
//! 3. Environment variables prefixed `TITLEDUPE_` (e.g. `TITLEDUPE_TOP_N=5`)
//! 4. Command-line flags ([`Config::merge_find_args`] and friends)
//!
//! # Example file
//!
//! ```toml
//! strategy = "optimized"
//! policy = "all-variants"
//! output = "json"
//! repeats = 5
//! top_n = 15
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::{BenchArgs, DetectArgs, FindArgs, OutputFormat, ProfileArgs, RunArgs, TimingArgs};
use crate::duplicates::{CasePolicy, Strategy};
use crate::profiling::{Profiler, DEFAULT_TOP_N};
use crate::timing::Timer;

/// Prefix of environment variables read as configuration.
pub const ENV_PREFIX: &str = "TITLEDUPE_";

/// Largest corpus the bench subcommand builds, scaling check included.
pub const MAX_BENCH_TITLES: usize = 10_000_000;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has the wrong shape.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] Box<figment::Error>),

    /// A value parsed but is out of range.
    #[error("Invalid value for '{key}': {message}")]
    Invalid {
        /// Configuration key
        key: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// The configuration could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the config file failed.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No platform config directory could be determined.
    #[error("Failed to determine project directories")]
    NoConfigDir,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detection algorithm for `find` and `profile`
    pub strategy: Strategy,
    /// Which spelling(s) of a repeated title to report
    pub policy: CasePolicy,
    /// Report format for `find`
    pub output: OutputFormat,
    /// Timed repeats per measurement
    pub repeats: usize,
    /// Runs inside each timed repeat
    pub runs_per_repeat: usize,
    /// Steps listed in profile reports
    pub top_n: usize,
    /// Share of repeated titles in synthetic corpora
    pub duplicate_ratio: f64,
    /// Seed for synthetic corpora
    pub seed: u64,
    /// Size of the synthetic corpus for `bench`
    pub bench_size: usize,
    /// Size multiplier for the scaling check
    pub scale_factor: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::Optimized,
            policy: CasePolicy::Canonical,
            output: OutputFormat::Text,
            repeats: 3,
            runs_per_repeat: 1,
            top_n: DEFAULT_TOP_N,
            duplicate_ratio: 0.05,
            seed: 42,
            bench_size: 1_000,
            scale_factor: 4,
        }
    }
}

impl Config {
    /// Load configuration from `explicit` if given, else from the default
    /// platform path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `explicit` does not exist, and
    /// [`ConfigError::Parse`] or [`ConfigError::Invalid`] for bad values in
    /// any layer.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_from_path(path)
            }
            None => match Self::default_path() {
                Ok(path) => Self::load_from_path(&path),
                Err(e) => {
                    log::debug!("{}, skipping config file", e);
                    Self::from_figment(Self::figment(None))
                }
            },
        }
    }

    /// Load configuration with `path` as the file layer.
    ///
    /// A missing file contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`] for bad
    /// values in any layer.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            log::debug!("Loading config from {}", path.display());
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
        }
        Self::from_figment(Self::figment(Some(path)))
    }

    /// The layered figment: defaults, then the TOML file, then environment.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let at_least = |key: &'static str, value: usize, min: usize| {
            if value < min {
                Err(ConfigError::Invalid {
                    key,
                    message: format!("must be at least {min}, got {value}"),
                })
            } else {
                Ok(())
            }
        };

        at_least("repeats", self.repeats, 1)?;
        at_least("runs_per_repeat", self.runs_per_repeat, 1)?;
        at_least("top_n", self.top_n, 1)?;
        at_least("bench_size", self.bench_size, 1)?;
        at_least("scale_factor", self.scale_factor, 2)?;
        if self.bench_size > MAX_BENCH_TITLES {
            return Err(ConfigError::Invalid {
                key: "bench_size",
                message: format!("must be at most {MAX_BENCH_TITLES}, got {}", self.bench_size),
            });
        }
        self.scaled_size(self.bench_size)?;

        if !(0.0..=1.0).contains(&self.duplicate_ratio) {
            return Err(ConfigError::Invalid {
                key: "duplicate_ratio",
                message: format!("must be between 0 and 1, got {}", self.duplicate_ratio),
            });
        }
        Ok(())
    }

    /// Size of the large corpus in the scaling check for a `base` size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `base * scale_factor` exceeds
    /// [`MAX_BENCH_TITLES`].
    pub fn scaled_size(&self, base: usize) -> Result<usize, ConfigError> {
        base.checked_mul(self.scale_factor)
            .filter(|&size| size <= MAX_BENCH_TITLES)
            .ok_or_else(|| ConfigError::Invalid {
                key: "scale_factor",
                message: format!(
                    "{base} titles x{} exceeds the limit of {MAX_BENCH_TITLES}",
                    self.scale_factor
                ),
            })
    }

    /// Write the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Serialize`] on failure.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when the platform offers no
    /// config directory (e.g. no home directory).
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let project_dirs =
            ProjectDirs::from("com", "titledupe", "titledupe").ok_or(ConfigError::NoConfigDir)?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Timer built from the repeat settings.
    #[must_use]
    pub fn timer(&self) -> Timer {
        Timer::new()
            .with_repeats(self.repeats)
            .with_runs_per_repeat(self.runs_per_repeat)
    }

    /// Profiler built from the top-N setting.
    #[must_use]
    pub fn profiler(&self) -> Profiler {
        Profiler::new(self.top_n)
    }

    /// Apply `--strategy` / `--policy`.
    pub fn merge_detect_args(&mut self, args: &DetectArgs) {
        if let Some(strategy) = args.strategy {
            self.strategy = strategy;
        }
        if let Some(policy) = args.policy {
            self.policy = policy;
        }
    }

    /// Apply `--repeats` / `--runs-per-repeat`.
    pub fn merge_timing_args(&mut self, args: &TimingArgs) {
        if let Some(repeats) = args.repeats {
            self.repeats = repeats.max(1);
        }
        if let Some(runs) = args.runs_per_repeat {
            self.runs_per_repeat = runs.max(1);
        }
    }

    /// Apply the flags of `find`.
    pub fn merge_find_args(&mut self, args: &FindArgs) {
        self.merge_detect_args(&args.detect);
        if let Some(output) = args.output {
            self.output = output;
        }
    }

    /// Apply the flags of `bench`.
    pub fn merge_bench_args(&mut self, args: &BenchArgs) {
        self.merge_timing_args(&args.timing);
        if let Some(policy) = args.policy {
            self.policy = policy;
        }
        if let Some(size) = args.size {
            self.bench_size = size.max(1);
        }
        if let Some(ratio) = args.duplicate_ratio {
            self.duplicate_ratio = ratio;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(factor) = args.scale_factor {
            self.scale_factor = factor.max(2);
        }
    }

    /// Apply the flags of `profile`.
    pub fn merge_profile_args(&mut self, args: &ProfileArgs) {
        self.merge_detect_args(&args.detect);
        if let Some(top) = args.top {
            self.top_n = top.max(1);
        }
    }

    /// Apply the flags of `run`.
    pub fn merge_run_args(&mut self, args: &RunArgs) {
        self.merge_timing_args(&args.timing);
        if let Some(policy) = args.policy {
            self.policy = policy;
        }
        if let Some(top) = args.top {
            self.top_n = top.max(1);
        }
    }
}
