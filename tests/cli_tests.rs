//! Integration tests for the daxgen CLI
//!
//! These tests run the actual binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test
fn daxgen_cmd() -> Command {
    Command::cargo_bin("daxgen").unwrap()
}

const DIAMOND: &str = r#"
schema: daxgen/workflow@0.1
name: diamond
jobs:
  - id: preprocess
    args: ["-i", {file: f.a}, "-o", {file: f.b1}, "-o", {file: f.b2}]
    uses:
      - {file: f.a, link: input}
      - {file: f.b1, link: output, transfer: false, register: false}
      - {file: f.b2, link: output, transfer: false, register: false}
  - id: findrange_left
    transformation: findrange
    args: ["-i", {file: f.b1}, "-o", {file: f.c1}]
    uses:
      - {file: f.b1, link: input}
      - {file: f.c1, link: output, transfer: false, register: false}
  - id: findrange_right
    transformation: findrange
    args: ["-i", {file: f.b2}, "-o", {file: f.c2}]
    uses:
      - {file: f.b2, link: input}
      - {file: f.c2, link: output, transfer: false, register: false}
  - id: analyze
    args: ["-i", {file: f.c1}, "-i", {file: f.c2}, "-o", {file: f.d}]
    uses:
      - {file: f.c1, link: input}
      - {file: f.c2, link: input}
      - {file: f.d, link: output, transfer: true, register: false}
flows:
  - source: preprocess
    target: [findrange_left, findrange_right]
  - source: [findrange_left, findrange_right]
    target: analyze
"#;

fn write_workflow(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_help_flag() {
    daxgen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DAX"));
}

#[test]
fn test_validate_diamond() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_workflow(&temp_dir, "diamond.dax.yaml", DIAMOND);

    daxgen_cmd()
        .args(["validate", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("Jobs: 4"))
        .stdout(predicate::str::contains("Dependencies: 4"))
        .stdout(predicate::str::contains("preprocess"));
}

#[test]
fn test_generate_writes_dax_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_workflow(&temp_dir, "diamond.dax.yaml", DIAMOND);
    let out = temp_dir.path().join("diamond.dax");

    daxgen_cmd()
        .args(["generate", &file, "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 jobs"));

    let dax = fs::read_to_string(&out).unwrap();
    assert!(dax.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(dax.contains("<adag xmlns=\"http://pegasus.isi.edu/schema/DAX\""));
    assert!(dax.contains("<job id=\"ID0000001\" name=\"preprocess\">"));
    assert!(dax.contains("<uses name=\"f.a\" link=\"input\"/>"));
    assert!(dax.contains("<child ref=\"ID0000004\">"));
    assert!(dax.trim_end().ends_with("</adag>"));
}

#[test]
fn test_generate_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_workflow(&temp_dir, "diamond.dax.yaml", DIAMOND);

    daxgen_cmd()
        .args(["generate", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("<adag"))
        .stdout(predicate::str::contains("</adag>"));
}

#[test]
fn test_missing_file_fails() {
    daxgen_cmd()
        .args(["validate", "no_such_workflow.dax.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_wrong_schema_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_workflow(
        &temp_dir,
        "bad_schema.dax.yaml",
        r#"
schema: daxgen/workflow@9.9
name: bad
jobs:
  - id: only
"#,
    );

    daxgen_cmd()
        .args(["validate", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DAX-001"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_cycle_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_workflow(
        &temp_dir,
        "cycle.dax.yaml",
        r#"
schema: daxgen/workflow@0.1
name: cyclic
jobs:
  - id: first
  - id: second
flows:
  - source: first
    target: second
  - source: second
    target: first
"#,
    );

    daxgen_cmd()
        .args(["generate", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DAX-020"));
}

#[test]
fn test_unknown_flow_target_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_workflow(
        &temp_dir,
        "unknown.dax.yaml",
        r#"
schema: daxgen/workflow@0.1
name: unknown
jobs:
  - id: only
flows:
  - source: only
    target: missing
"#,
    );

    daxgen_cmd()
        .args(["validate", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DAX-021"));
}

#[test]
fn test_unconnected_file_flow_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_workflow(
        &temp_dir,
        "unlinked.dax.yaml",
        r#"
schema: daxgen/workflow@0.1
name: unlinked
jobs:
  - id: produce
    uses:
      - {file: f.mid, link: output}
  - id: consume
    uses:
      - {file: f.mid, link: input}
"#,
    );

    daxgen_cmd()
        .args(["validate", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DAX-032"))
        .stderr(predicate::str::contains("f.mid"));
}
