//! # Jolt Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the Jolt application.
//! It follows the same two-part approach everywhere:
//! - `JoltError`: a `thiserror` enum naming the failures callers may want to match on
//! - `Result<T>`: an alias for `anyhow::Result<T>` so context can be attached freely
//!
//! The error variants cover:
//! - Configuration loading (missing explicit file, malformed JSON or env file)
//! - External tool invocation (spawn failures, non-zero exits, unparsable output)
//! - Strict resolver lookups (`throw_on_fail`) hitting an unavailable tool
//! - Exit code relay for `jolt run`
//!
//! ## Examples
//!
//! ```rust
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//!
//! // Relay a child's exit status
//! match result {
//!     Err(e) => match e.downcast_ref::<JoltError>() {
//!         Some(JoltError::ExitStatus { code, .. }) => std::process::exit(*code),
//!         _ => return Err(e),
//!     },
//!     Ok(v) => v,
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the Jolt application.
#[derive(Error, Debug)]
pub enum JoltError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file '{}' not found.", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse JSON configuration '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse env configuration '{}': {source}", path.display())]
    EnvFileParse {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Command '{cmd}' not found on PATH.")]
    CommandNotFound { cmd: String },

    #[error("Command '{cmd}' could not be started: {source}")]
    CommandSpawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Output of '{cmd}' could not be parsed: {source}")]
    InvalidToolOutput {
        cmd: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{tool} is unavailable: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    #[error("Command '{cmd}' exited with code {code}.")]
    ExitStatus { cmd: String, code: i32 },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
