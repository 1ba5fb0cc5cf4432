use std::fs;
use titledupe::duplicates::detect_duplicates;
use titledupe::source::{read_lines, SourceError};
use tempfile::tempdir;

#[test]
fn test_read_lines_preserves_order_and_case() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("movies.txt");
    fs::write(&path, "Alien\nHEAT\nalien\n").unwrap();

    let titles = read_lines(&path).unwrap();
    assert_eq!(titles, vec!["Alien", "HEAT", "alien"]);
}

#[test]
fn test_read_lines_strips_crlf() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("windows.txt");
    fs::write(&path, "Alien\r\nHeat\r\n").unwrap();

    let titles = read_lines(&path).unwrap();
    assert_eq!(titles, vec!["Alien", "Heat"]);
    assert!(titles.iter().all(|t| !t.contains('\r')));
}

#[test]
fn test_read_carriage_return_only_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("classic_mac.txt");
    fs::write(&path, "Alien\rHeat\ralien\r").unwrap();

    let titles = read_lines(&path).unwrap();
    assert_eq!(titles, vec!["Alien", "Heat", "alien"]);
    assert_eq!(detect_duplicates(&titles).titles(), vec!["Alien"]);
}

#[test]
fn test_read_trailing_carriage_return_on_last_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trailing_cr.txt");
    fs::write(&path, "Alien\nalien\r").unwrap();

    let titles = read_lines(&path).unwrap();
    assert_eq!(titles, vec!["Alien", "alien"]);
    assert_eq!(detect_duplicates(&titles).titles(), vec!["Alien"]);
}

#[test]
fn test_read_empty_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").unwrap();

    let titles = read_lines(&path).unwrap();
    assert!(titles.is_empty());
    assert!(detect_duplicates(&titles).is_empty());
}

#[test]
fn test_read_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.txt");

    match read_lines(&path) {
        Err(SourceError::NotFound(p)) => assert_eq!(p, path),
        other => panic!("Expected NotFound error, got {other:?}"),
    }
}

#[test]
fn test_read_directory() {
    let dir = tempdir().unwrap();

    match read_lines(dir.path()) {
        Err(SourceError::NotAFile(p)) => assert_eq!(p, dir.path()),
        other => panic!("Expected NotAFile error, got {other:?}"),
    }
}

#[test]
fn test_read_invalid_utf8() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    fs::write(&path, [b'A', b'm', 0xE9, b'l', b'i', b'e', b'\n']).unwrap();

    match read_lines(&path) {
        Err(err @ SourceError::Io { .. }) => assert_eq!(err.path(), path),
        other => panic!("Expected Io error, got {other:?}"),
    }
}

#[test]
fn test_read_unicode_titles() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("intl.txt");
    fs::write(&path, "Amélie\nAMÉLIE\n千と千尋の神隠し\n").unwrap();

    let titles = read_lines(&path).unwrap();
    assert_eq!(detect_duplicates(&titles).titles(), vec!["Amélie"]);
}
