//! # Jolt Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities used by both the configuration core and the command
//! handlers. Keeping them here separates command-specific logic (`commands::`)
//! from core infrastructure (`core::`).
//!
//! - **`process`**: Spawning external tools, capturing or streaming their output,
//!   classifying failures, and the `ToolRunner` seam used by the resolver.
//! - **`system`**: Host inspection (is an executable on PATH).
//!

/// Executing external processes and the `ToolRunner` trait.
pub mod process;
/// System-level checks such as PATH lookups.
pub mod system;
