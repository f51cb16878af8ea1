//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

/// Build command for the schparts-cli binary (finds it in target/debug when run via cargo test).
fn schparts_cli() -> Command {
    cargo_bin_cmd!("schparts-cli")
}

/// Path to schparts library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("schparts")
        .join("tests")
        .join("fixtures")
}

fn scratch_board(dir: &Path) -> PathBuf {
    let target = dir.join("board.sch");
    std::fs::copy(fixtures_dir().join("board.sch"), &target).unwrap();
    target
}

#[test]
fn test_cli_help() {
    let mut cmd = schparts_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("KiCad"));
}

#[test]
fn test_cli_version() {
    let mut cmd = schparts_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_groups_command() {
    let mut cmd = schparts_cli();

    cmd.arg(fixtures_dir().join("board.sch"))
        .arg("-c")
        .arg("groups");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"100nF\" (2): C1, C2"))
        .stdout(predicate::str::contains("\"10k\" (1): R1"));
}

#[test]
fn test_cli_groups_json() {
    let mut cmd = schparts_cli();

    cmd.arg(fixtures_dir().join("board.sch"))
        .arg("--format")
        .arg("json")
        .arg("-c")
        .arg("groups");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"references\""))
        .stdout(predicate::str::contains("\"count\": 2"));
}

#[test]
fn test_cli_update_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let board = scratch_board(dir.path());

    let mut cmd = schparts_cli();
    cmd.arg(&board)
        .arg("-c")
        .arg("update 100nF manufacturer=Acme mpn=AC-1")
        .arg("-c")
        .arg("save");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Updated 2 component(s)"))
        .stdout(predicate::str::contains("Saved 4 component(s)"));

    let saved = std::fs::read_to_string(&board).unwrap();
    assert_eq!(saved.matches("F 5 \"Acme\"").count(), 2);
    assert_eq!(saved.matches("F 6 \"AC-1\"").count(), 2);
}

#[test]
fn test_cli_output_flag_leaves_source() {
    let dir = tempfile::tempdir().unwrap();
    let board = scratch_board(dir.path());
    let edited = dir.path().join("edited.sch");
    let original = std::fs::read_to_string(&board).unwrap();

    let mut cmd = schparts_cli();
    cmd.arg(&board)
        .arg("--output")
        .arg(&edited)
        .arg("-c")
        .arg("set 1 footprint=R_0603")
        .arg("-c")
        .arg("save");

    cmd.assert().success();
    assert_eq!(std::fs::read_to_string(&board).unwrap(), original);
    assert!(std::fs::read_to_string(&edited)
        .unwrap()
        .contains("F 2 \"R_0603\""));
}

#[test]
fn test_cli_unknown_group_fails() {
    let mut cmd = schparts_cli();

    cmd.arg(fixtures_dir().join("board.sch"))
        .arg("-c")
        .arg("update 4.7uF mpn=X");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("No components with value \"4.7uF\""));
}

#[test]
fn test_cli_shell_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let board = scratch_board(dir.path());

    let mut cmd = schparts_cli();
    cmd.arg(&board)
        .write_stdin("list\nbogus\nset 0 spn=\"490-10451-1-ND\"\nsave\nquit\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("R1"))
        .stdout(predicate::str::contains("Updated C1"))
        .stderr(predicate::str::contains("unknown command 'bogus'"));

    assert!(std::fs::read_to_string(&board)
        .unwrap()
        .contains("F 8 \"490-10451-1-ND\" H 4650 2300 50  0001 C CNN \"Supplier Part Number\""));
}

#[test]
fn test_cli_warns_about_unsaved_changes() {
    let mut cmd = schparts_cli();

    cmd.arg(fixtures_dir().join("board.sch"))
        .write_stdin("normalize\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Added 10 field slot(s)"))
        .stderr(predicate::str::contains("unsaved changes"));
}

#[test]
fn test_cli_nonexistent_file() {
    let mut cmd = schparts_cli();

    cmd.arg("does_not_exist.sch");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("does_not_exist.sch"));
}
