//! Conformance tests that run YAML fixtures against pmatch
//!
//! Run with: cargo test -p pmatch-test --test conformance --features fixtures

#![cfg(feature = "fixtures")]

use pmatch_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run every fixture of one file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    let yaml = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {e}", path.display());
    });
    assert!(!fixtures.is_empty(), "{} holds no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert();
    }
}

#[test]
fn test_literals() {
    run_fixture_file("01_literals.yaml");
}

#[test]
fn test_combinators() {
    run_fixture_file("02_combinators.yaml");
}

#[test]
fn test_captures() {
    run_fixture_file("03_captures.yaml");
}

#[test]
fn test_segments() {
    run_fixture_file("04_segments.yaml");
}

#[test]
fn test_guards() {
    run_fixture_file("05_guards.yaml");
}

#[test]
fn test_nullables() {
    run_fixture_file("06_nullables.yaml");
}

#[test]
fn test_config_errors() {
    run_fixture_file("07_config_errors.yaml");
}

#[test]
fn every_fixture_file_is_covered() {
    let mut files: Vec<String> = fs::read_dir(fixtures_dir())
        .expect("read fixtures dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".yaml") || name.ends_with(".yml"))
        .collect();
    files.sort();
    assert_eq!(files.len(), 7, "new fixture files need a test above: {files:?}");
}
