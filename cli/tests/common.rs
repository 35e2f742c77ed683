//! # Jolt CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test runs
//! the compiled `jolt` binary inside a fresh temporary project directory, with
//! every environment variable Jolt reads removed so the host machine cannot
//! leak into the result.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Environment variables Jolt consults. Cleared for every test invocation.
const JOLT_ENV_VARS: &[&str] = &[
    "JOLT_SITE",
    "JOLT_CONFIG",
    "RUST_LOG",
    "DOCKER_COMMAND",
    "COMPOSE_COMMAND",
    "TERRAFORM_COMMAND",
    "NODE_COMMAND",
    "YARN_COMMAND",
    "AWS_COMMAND",
    "SSH_COMMAND",
    "RSYNC_COMMAND",
    "GIT_COMMAND",
    "GZIP_COMMAND",
];

/// # Get Jolt Command (`jolt_cmd`)
///
/// An `assert_cmd::Command` for the compiled `jolt` binary with the Jolt
/// environment variables (and their `JOLT_` prefixed forms) removed.
///
/// ## Panics
/// Panics if the `jolt` binary cannot be found via `Command::cargo_bin`.
pub fn jolt_cmd() -> Command {
    let mut cmd = Command::cargo_bin("jolt").expect("Failed to find jolt binary for testing");
    for var in JOLT_ENV_VARS {
        cmd.env_remove(var);
        cmd.env_remove(format!("JOLT_{}", var));
    }
    cmd
}

/// A throwaway project directory.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp project dir"),
        }
    }

    /// A project with `.jolt.json` containing `json`.
    pub fn with_config(json: &str) -> Self {
        let project = Self::new();
        project.write(".jolt.json", json);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join(name), content).expect("Failed to write fixture");
    }

    /// `jolt_cmd()` running inside this project.
    pub fn jolt(&self) -> Command {
        let mut cmd = jolt_cmd();
        cmd.current_dir(self.dir.path());
        cmd
    }
}
