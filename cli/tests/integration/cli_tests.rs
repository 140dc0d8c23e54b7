//! Integration tests for the CLI surface: help, version, global flags and
//! error reporting.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::sandbox::Sandbox;

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    Sandbox::new()
        .remotekit()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_help_lists_commands() {
    Sandbox::new()
        .remotekit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("targets"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_version_command_shows_version() {
    Sandbox::new()
        .remotekit()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "remotekit ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = Sandbox::new()
        .remotekit()
        .args(["--json", "version"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    Sandbox::new()
        .remotekit()
        .arg("frobnicate")
        .assert()
        .code(2);
}

#[test]
fn test_exec_requires_a_command() {
    Sandbox::new()
        .remotekit()
        .args(["exec", "host1"])
        .assert()
        .code(2);
}

// --- Error reporting ---

#[test]
fn test_unknown_target_exits_three() {
    Sandbox::new()
        .remotekit()
        .args(["exec", "nope", "--", "true"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Target 'nope' not found"));
}

#[test]
fn test_unknown_target_json_error() {
    let output = Sandbox::new()
        .remotekit()
        .args(["--json", "exec", "nope", "--", "true"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(3));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "config_not_found");
    assert!(
        value["message"]
            .as_str()
            .expect("message")
            .contains("nope")
    );
}

#[test]
fn test_malformed_targets_file_exits_three() {
    Sandbox::with_targets("targets: [unclosed")
        .remotekit()
        .args(["exec", "host1", "--", "true"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Cannot read configuration"));
}

#[test]
fn test_invalid_target_names_the_field() {
    Sandbox::with_targets("targets:\n  host1:\n    user: tester\n")
        .remotekit()
        .args(["exec", "host1", "--", "true"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid host"));
}

#[test]
fn test_empty_remote_path_is_refused() {
    Sandbox::new()
        .remotekit()
        .args(["cat", "host1", ""])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("path is empty"));
}
