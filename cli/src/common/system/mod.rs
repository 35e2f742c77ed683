//! # Jolt System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Host inspection helpers. Currently this is the PATH availability check used
//! by `jolt config cmd` diagnostics and, through `SystemRunner`, by the
//! `tofu`/`terraform` default selection in the resolver.
//!
use tracing::trace;

/// Returns true if `program` resolves to an executable on PATH.
///
/// Paths containing a separator are checked directly by `which`.
pub fn is_on_path(program: &str) -> bool {
    let found = which::which(program).is_ok();
    trace!("PATH lookup for '{}': {}", program, found);
    found
}
