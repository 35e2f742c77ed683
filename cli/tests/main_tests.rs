//! # Jolt CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Top-level behaviour of the `jolt` binary: standard flags, unknown
//! subcommands, and configuration loading errors that happen before any
//! command handler runs.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    jolt_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_command_groups() {
    jolt_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_no_subcommand_fails() {
    jolt_cmd().assert().failure();
}

#[test]
fn test_unknown_subcommand_fails() {
    jolt_cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let project = Project::new();
    project
        .jolt()
        .args(["--config", "nope.json", "config", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let project = Project::with_config("{ not json");
    project
        .jolt()
        .args(["config", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse JSON configuration"));
}
