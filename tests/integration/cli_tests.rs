//! End-to-end tests driving the subcommands through `run_with_writer`.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use titledupe::cli::Cli;
use titledupe::error::ExitCode;
use titledupe::run_with_writer;

use super::env_lock;

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "").unwrap();
        Self { dir, config }
    }

    fn titles(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<(ExitCode, String)> {
        let mut argv = vec![
            "titledupe".to_string(),
            "--no-color".to_string(),
            "--config".to_string(),
            self.config.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));

        let cli = Cli::try_parse_from(argv).unwrap();
        let _lock = env_lock();
        let mut out = Vec::new();
        let code = run_with_writer(cli, &mut out)?;
        Ok((code, String::from_utf8(out).unwrap()))
    }
}

fn arg(path: &Path) -> String {
    path.display().to_string()
}

const MOVIES: &str = "Alien\nHeat\nALIEN\nUp\nheat\nalien\n";

#[test]
fn test_find_lists_duplicates() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let (code, out) = fx.run(&["find", &arg(&path)]).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert_eq!(out, "Found 2 duplicate movies:\nAlien\nHeat\n");
}

#[test]
fn test_find_all_variants() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let (_, out) = fx
        .run(&["find", &arg(&path), "--policy", "all-variants"])
        .unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Found 5 duplicate movies:");
    assert_eq!(&lines[1..], &["Alien", "Heat", "ALIEN", "heat", "alien"]);
}

#[test]
fn test_find_naive_matches_optimized() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let (_, naive) = fx
        .run(&["find", &arg(&path), "--strategy", "naive"])
        .unwrap();
    let (_, optimized) = fx
        .run(&["find", &arg(&path), "--strategy", "optimized"])
        .unwrap();
    assert_eq!(naive, optimized);
}

#[test]
fn test_find_without_duplicates() {
    let fx = Fixture::new();
    let path = fx.titles("unique.txt", "Alien\nHeat\nUp\n");

    let (code, out) = fx.run(&["find", &arg(&path)]).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
    assert_eq!(out, "Found 0 duplicate movies:\n");
}

#[test]
fn test_find_empty_file() {
    let fx = Fixture::new();
    let path = fx.titles("empty.txt", "");

    let (code, out) = fx.run(&["find", &arg(&path)]).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
    assert_eq!(out, "Found 0 duplicate movies:\n");
}

#[test]
fn test_find_json() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let (_, out) = fx
        .run(&["find", &arg(&path), "--output", "json"])
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["total_titles"], 6);
    assert_eq!(value["duplicate_count"], 2);
    assert_eq!(value["extra_copies"], 3);
    assert_eq!(value["strategy"], "optimized");
    assert_eq!(value["policy"], "canonical");
    assert_eq!(value["duplicates"][0]["title"], "Alien");
    assert_eq!(value["duplicates"][0]["occurrences"], 3);
}

#[test]
fn test_find_csv() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let (_, out) = fx.run(&["find", &arg(&path), "-o", "csv"]).unwrap();
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("title,normalized,occurrences"));
    assert_eq!(lines.next(), Some("Alien,alien,3"));
    assert_eq!(lines.next(), Some("Heat,heat,2"));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_output_format_from_config_file() {
    let fx = Fixture::new();
    fs::write(&fx.config, "output = \"csv\"\n").unwrap();
    let path = fx.titles("movies.txt", MOVIES);

    let (_, out) = fx.run(&["find", &arg(&path)]).unwrap();
    assert!(out.starts_with("title,normalized,occurrences"));

    // The flag wins over the file
    let (_, out) = fx.run(&["find", &arg(&path), "-o", "text"]).unwrap();
    assert!(out.starts_with("Found 2 duplicate movies:"));
}

#[test]
fn test_find_missing_file_is_an_error() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("missing.txt");

    let err = fx.run(&["find", &arg(&missing)]).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Failed to read titles"));
    assert!(message.contains("missing.txt"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);
    let cli = Cli::try_parse_from([
        "titledupe".to_string(),
        "--config".to_string(),
        arg(&fx.dir.path().join("absent.toml")),
        "find".to_string(),
        arg(&path),
    ])
    .unwrap();

    let _lock = env_lock();
    let err = run_with_writer(cli, &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("Config file not found"));
}

#[test]
fn test_profile_reports_steps() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let (code, out) = fx.run(&["profile", &arg(&path)]).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(out.starts_with("Found 2 duplicate movies\n"));
    assert!(out.contains("(find_duplicates)"));
    assert!(out.contains("read_lines"));
    assert!(out.contains("count_keys"));
}

#[test]
fn test_profile_naive_with_top() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let (_, out) = fx
        .run(&["profile", &arg(&path), "--strategy", "naive", "--top", "1"])
        .unwrap();
    assert!(out.contains("(find_duplicates_naive)"));
    assert!(out.contains("List reduced from"));
}

#[test]
fn test_bench_file_without_scaling() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let (code, out) = fx
        .run(&["bench", &arg(&path), "--repeats", "1", "--no-scaling"])
        .unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(out.starts_with("--- Timing, 6 titles ---\n"));
    assert!(out.contains("func=find_duplicates_naive  num_repeats=1"));
    assert!(out.contains("func=find_duplicates  num_repeats=1"));
    assert!(!out.contains("Scaling"));
    assert!(!out.contains("RESULTS DIFFER"));
}

#[test]
fn test_bench_synthetic_with_scaling() {
    let fx = Fixture::new();

    let (code, out) = fx
        .run(&[
            "bench",
            "--size",
            "50",
            "--scale-factor",
            "2",
            "--repeats",
            "1",
        ])
        .unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(out.contains("--- Timing, 50 titles ---"));
    assert!(out.contains("Scaling 50 -> 100 titles (x2):"));
}

#[test]
fn test_bench_scaling_is_labelled_synthetic() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let (_, out) = fx
        .run(&["bench", &arg(&path), "--repeats", "1", "--scale-factor", "2"])
        .unwrap();
    assert!(out.contains("--- Scaling, synthetic titles (5% repeats, seed 42) ---"));
    assert!(out.contains("Scaling 6 -> 12 titles (x2):"));
}

#[test]
fn test_bench_rejects_size_with_file() {
    let result = Cli::try_parse_from(["titledupe", "bench", "movies.txt", "--size", "100"]);
    assert!(result.is_err());
}

#[test]
fn test_bench_huge_size_is_an_error() {
    let fx = Fixture::new();

    let err = fx
        .run(&["bench", "--size", &usize::MAX.to_string(), "--repeats", "1"])
        .unwrap_err();
    assert!(format!("{err:#}").contains("bench_size"));
}

#[test]
fn test_bench_huge_scale_factor_is_an_error() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let err = fx
        .run(&[
            "bench",
            &arg(&path),
            "--scale-factor",
            &usize::MAX.to_string(),
            "--repeats",
            "1",
        ])
        .unwrap_err();
    assert!(format!("{err:#}").contains("scale_factor"));
}

#[test]
fn test_find_classic_mac_line_endings() {
    let fx = Fixture::new();
    let path = fx.titles("mac.txt", "Alien\rHeat\ralien\r");

    let (code, out) = fx.run(&["find", &arg(&path)]).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert_eq!(out, "Found 1 duplicate movies:\nAlien\n");
}

#[test]
fn test_run_walkthrough() {
    let fx = Fixture::new();
    let path = fx.titles("movies.txt", MOVIES);

    let (code, out) = fx.run(&["run", &arg(&path), "--repeats", "1"]).unwrap();
    assert_eq!(code, ExitCode::Success);

    let headings = [
        "--- Before optimization ---",
        "Found 2 duplicate movies:",
        "--- Timeit results, before optimization ---",
        "func=find_duplicates_naive",
        "--- Timeit results, after optimization ---",
        "func=find_duplicates ",
        "--- Profile results, before optimization ---",
        "--- Profile results, after optimization ---",
        "Completed.",
    ];
    let mut rest = out.as_str();
    for heading in headings {
        let at = rest
            .find(heading)
            .unwrap_or_else(|| panic!("missing or out of order: {heading}"));
        rest = &rest[at + heading.len()..];
    }
}

#[test]
fn test_run_missing_file() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("movies.txt");

    assert!(fx.run(&["run", &arg(&missing)]).is_err());
}
