//! Integration tests for the configuration layers: defaults, TOML file,
//! `TITLEDUPE_*` environment variables and CLI flags.

use clap::Parser;
use std::fs;
use tempfile::tempdir;
use titledupe::cli::{Cli, Commands, OutputFormat};
use titledupe::config::{Config, ConfigError};
use titledupe::duplicates::{CasePolicy, Strategy};

use super::env_lock;

/// Clear all TITLEDUPE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("TITLEDUPE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_missing_file_uses_defaults() {
    let _lock = env_lock();
    clear_env();
    let dir = tempdir().unwrap();

    let config = Config::load_from_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let _lock = env_lock();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    match Config::load(Some(path.as_path())) {
        Err(ConfigError::NotFound(p)) => assert_eq!(p, path),
        other => panic!("Expected NotFound error, got {other:?}"),
    }
}

#[test]
fn test_load_from_toml() {
    let _lock = env_lock();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
strategy = "naive"
policy = "all-variants"
output = "csv"
repeats = 5
top_n = 3
duplicate_ratio = 0.25
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.strategy, Strategy::Naive);
    assert_eq!(config.policy, CasePolicy::AllVariants);
    assert_eq!(config.output, OutputFormat::Csv);
    assert_eq!(config.repeats, 5);
    assert_eq!(config.top_n, 3);
    assert_eq!(config.duplicate_ratio, 0.25);
    // Untouched keys keep their defaults
    assert_eq!(config.runs_per_repeat, 1);
    assert_eq!(config.seed, 42);
}

#[test]
fn test_invalid_toml_value() {
    let _lock = env_lock();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "strategy = \"quantum\"\n").unwrap();

    assert!(matches!(
        Config::load_from_path(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_out_of_range_value() {
    let _lock = env_lock();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "top_n = 0\n").unwrap();

    assert!(matches!(
        Config::load_from_path(&path),
        Err(ConfigError::Invalid { key: "top_n", .. })
    ));
}

#[test]
fn test_hierarchy_defaults_file_env_cli() {
    let _lock = env_lock();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    // 1. Config file overrides defaults
    fs::write(&path, "policy = \"all-variants\"\nrepeats = 8\n").unwrap();
    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.policy, CasePolicy::AllVariants);
    assert_eq!(config.repeats, 8);

    // 2. Environment variables override the config file
    std::env::set_var("TITLEDUPE_REPEATS", "2");
    std::env::set_var("TITLEDUPE_STRATEGY", "naive");
    let mut config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.repeats, 2);
    assert_eq!(config.strategy, Strategy::Naive);
    assert_eq!(config.policy, CasePolicy::AllVariants);

    // 3. CLI flags override environment variables
    let cli = Cli::try_parse_from([
        "titledupe",
        "find",
        "movies.txt",
        "--strategy",
        "optimized",
        "--output",
        "json",
    ])
    .unwrap();
    if let Commands::Find(args) = &cli.command {
        config.merge_find_args(args);
    }
    assert_eq!(config.strategy, Strategy::Optimized);
    assert_eq!(config.output, OutputFormat::Json);
    assert_eq!(config.policy, CasePolicy::AllVariants);
    assert_eq!(config.repeats, 2);

    clear_env();
}

#[test]
fn test_bench_flags_override_config() {
    let _lock = env_lock();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "bench_size = 5000\nseed = 1\nscale_factor = 3\n").unwrap();

    let mut config = Config::load_from_path(&path).unwrap();
    let cli = Cli::try_parse_from([
        "titledupe",
        "bench",
        "--size",
        "200",
        "--scale-factor",
        "1",
        "--runs-per-repeat",
        "4",
    ])
    .unwrap();
    if let Commands::Bench(args) = &cli.command {
        config.merge_bench_args(args);
    }

    assert_eq!(config.bench_size, 200);
    assert_eq!(config.seed, 1);
    assert_eq!(config.scale_factor, 2);
    assert_eq!(config.runs_per_repeat, 4);
    assert!(config.validate().is_ok());
}

#[test]
fn test_save_and_reload() {
    let _lock = env_lock();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = Config {
        strategy: Strategy::Naive,
        top_n: 4,
        duplicate_ratio: 0.5,
        ..Config::default()
    };
    config.save(&path).unwrap();

    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.contains("strategy = \"naive\""));
    assert!(saved.contains("top_n = 4"));

    assert_eq!(Config::load(Some(path.as_path())).unwrap(), config);
}
