//! # Jolt Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the configuration engine every Jolt command relies on.
//!
//! ## Architecture
//!
//! - `config`: Finding and parsing the configuration document (`.jolt.json`, `.env`, ...)
//! - `containers`: Compose topology types and database/cache engine detection
//! - `error`: Error types and the crate-wide `Result` alias
//! - `overrides`: The logical command table and `CommandOverride`
//! - `resolver`: `ConfigResolver`, the layered and memoizing lookup API
//! - `templating`: Finding and splicing `{type:name}` placeholders
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::error::{JoltError, Result};
//! use crate::core::resolver::ConfigResolver;
//!
//! async fn handler(resolver: &ConfigResolver) -> Result<()> {
//!     let image = resolver.docker_image_name(false).await;
//!     let tag = resolver.parse_arg("{conf:imageName}:{git:sha}", &Default::default()).await;
//!     Ok(())
//! }
//! ```
//!
pub mod config;
pub mod containers;
pub mod error;
pub mod overrides;
pub mod resolver;
pub mod templating;
