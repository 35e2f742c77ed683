//! # Jolt Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates all top-level command groups of the Jolt CLI and
//! exposes them to `main.rs`.
//!
//! ## Architecture
//!
//! - Top-level modules represent command groups (`config`, `inspect`) or a
//!   single command (`run`)
//! - Each group contains subcommands in their own files
//! - Every handler receives the `ConfigResolver` built in `main` by reference
//!
//! ## Command Groups
//!
//! - `config`: Inspect the loaded configuration, command overrides and interpolation
//! - `inspect`: Derived lookups (database/cache containers, images, terraform outputs, compose services)
//! - `run`: Run a wrapped tool with interpolated arguments and relay its exit code
//!
use crate::core::error::{JoltError, Result};

/// Configuration diagnostics. Includes `list`, `get`, `cmd`, `parse`.
pub mod config;
/// Derived lookups. Includes `db`, `cache`, `image`, `repo`, `tf`, `compose`.
pub mod inspect;
/// Runs a logical tool with interpolated arguments.
pub mod run;

/// Parses a `key=value` pair for `--param` style flags.
pub(crate) fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (key, value) = s.split_once('=').ok_or_else(|| {
        JoltError::ArgumentParsing(format!("Expected KEY=VALUE, got '{}'", s))
    })?;
    if key.is_empty() {
        return Err(JoltError::ArgumentParsing(format!("Empty key in '{}'", s)).into());
    }
    Ok((key.to_string(), value.to_string()))
}
