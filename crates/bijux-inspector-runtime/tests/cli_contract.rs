// SPDX-License-Identifier: Apache-2.0

use assert_cmd::Command;
use serde_json::Value;
use std::fs;

fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write csv");
    path.to_string_lossy().into_owned()
}

fn run_json(args: &[&str]) -> Value {
    let output = Command::new(env!("CARGO_BIN_EXE_bijux-inspector"))
        .args(args)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json stdout")
}

#[test]
fn query_filters_a_single_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_csv(&dir, "people.csv", "Name,Age\nAlice,30\nBob,25\n");
    let out = run_json(&["query", "--path", &path, "--query", "A", "--column", "0"]);
    assert_eq!(out["filtered"], 1);
    assert_eq!(out["total"], 2);
    assert_eq!(out["rows"][0][0], "Alice");
    assert_eq!(out["merged"], false);
}

#[test]
fn query_merges_several_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = write_csv(&dir, "a.csv", "Name,Age\nAlice,30\nBob,25\n");
    let b = write_csv(&dir, "b.csv", "Name,City\nAnna,Oslo\nBob,Rome\n");
    let out = run_json(&[
        "query", "--path", &a, "--path", &b, "--query", "bob", "--headers", "yes",
    ]);
    assert_eq!(out["merged"], true);
    assert_eq!(out["headers"][0], "_source_file");
    assert_eq!(out["filtered"], 2);
    assert_eq!(out["rows"][1][0], "b.csv");
}

#[test]
fn profile_reports_every_column() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_csv(&dir, "people.csv", "Name,Age\nAlice,30\nBob,25\n");
    let out = run_json(&["profile", "--path", &path, "--tier", "fast"]);
    let columns = out["columns"].as_array().expect("columns");
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[1]["type"], "numeric");
    assert_eq!(out["sampleSize"], 2);
}

#[test]
fn categories_list_distinct_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_csv(&dir, "c.csv", "city\nParis\nLyon\nParis\n");
    let out = run_json(&["categories", "--path", &path, "--column", "0", "--headers", "yes"]);
    assert_eq!(out["distinctTotal"], 2);
    assert_eq!(out["values"][0]["value"], "Paris");
    assert_eq!(out["values"][0]["count"], 2);
}

#[test]
fn invalid_regex_exits_with_validation_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_csv(&dir, "people.csv", "Name,Age\nAlice,30\nBob,25\n");
    let output = Command::new(env!("CARGO_BIN_EXE_bijux-inspector"))
        .args(["query", "--path", &path, "--query", "(", "--mode", "regex"])
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn missing_file_exits_with_dependency_code() {
    let output = Command::new(env!("CARGO_BIN_EXE_bijux-inspector"))
        .args(["profile", "--path", "/no/such/file.csv", "--headers", "yes"])
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_bijux-inspector"))
        .arg("frobnicate")
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(2));
}
