//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `featsel` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("featsel").unwrap()
}

/// Feature `x` separates the classes, `noise` does not.
const SEPARABLE_CSV: &str = "\
x,noise,label
0.0,3.0,a
5.0,1.0,b
0.2,9.0,a
5.2,4.0,b
0.4,6.0,a
5.4,8.0,b
0.1,2.0,a
0.3,8.1,a
5.1,2.5,b
0.5,1.2,a
";

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("select"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("featsel"));
}

// ---------------------------------------------------------------------------
// Select subcommand
// ---------------------------------------------------------------------------

#[test]
fn select_without_data_errors() {
    cmd().arg("select").assert().failure();
}

#[test]
fn select_nonexistent_data_errors() {
    cmd()
        .args(["select", "/nonexistent/data.csv"])
        .assert()
        .failure();
}

#[test]
fn select_picks_the_separating_column() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "data.csv", SEPARABLE_CSV);
    cmd()
        .arg("select")
        .arg(&data)
        .args(["-k", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected 1 of 2 features [0] (x)"))
        .stdout(predicate::str::contains("accuracy=1.0000"));
}

#[test]
fn select_writes_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "data.csv", SEPARABLE_CSV);
    let output = dir.path().join("report.json");
    cmd()
        .arg("select")
        .arg(&data)
        .args(["-k", "1", "--max-features", "1", "-o"])
        .arg(&output)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["selected"], serde_json::json!([0]));
    assert_eq!(report["selected_names"], serde_json::json!(["x"]));
    assert_eq!(report["iterations"], serde_json::json!(1));
}

#[test]
fn select_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "data.csv", SEPARABLE_CSV);
    let config = write_file(
        &dir,
        "config.json",
        r#"{"knn": {"k": 1, "train_ratio": 0.7}, "stopping": {"max_features": {"max_features": 1}}}"#,
    );
    cmd()
        .arg("select")
        .arg(&data)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("iterations=1"));
}

#[test]
fn select_too_few_rows_for_k_fails() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "data.csv", "x,label\n1,a\n2,b\n3,a\n");
    cmd()
        .arg("select")
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Feature selection failed"));
}

#[test]
fn max_features_conflicts_with_patience() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "data.csv", SEPARABLE_CSV);
    cmd()
        .arg("select")
        .arg(&data)
        .args(["--max-features", "1", "--patience", "2"])
        .assert()
        .failure();
}
