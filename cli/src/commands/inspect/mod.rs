//! # Jolt Inspect Command Group
//!
//! File: cli/src/commands/inspect/mod.rs
//!
//! ## Overview
//!
//! Entry point and router for `jolt inspect`. Each subcommand prints one of
//! the resolver's derived lookups, the same values wrapped commands and
//! `{db:...}` / `{tf:...}` placeholders use.
//!
//! ## Examples
//!
//! ```bash
//! jolt inspect db             # detected database container + credentials
//! jolt inspect cache          # detected cache container
//! jolt inspect image --dev    # development image name
//! jolt inspect repo           # production image repository
//! jolt inspect tf vpc_id      # one infrastructure output
//! jolt inspect compose        # services in the rendered compose topology
//! ```
//!
//! Lookups that come back empty exit with an error so the result can be
//! checked from scripts.
//!
use crate::core::error::{JoltError, Result};
use crate::core::resolver::ConfigResolver;
use clap::{Parser, Subcommand};

/// Implements `jolt inspect db|cache|compose`.
mod containers;
/// Implements `jolt inspect image|repo`.
mod image;
/// Implements `jolt inspect tf`.
mod tf;

/// # Inspect Command Group Arguments (`InspectArgs`)
#[derive(Parser, Debug)]
pub struct InspectArgs {
    #[command(subcommand)]
    command: InspectCommand,
}

#[derive(Subcommand, Debug)]
enum InspectCommand {
    /// Database container, engine and credentials.
    Db(containers::DbArgs),
    /// Cache container and engine.
    Cache(containers::CacheArgs),
    /// Services in the compose topology.
    Compose(containers::ComposeArgs),
    /// Docker image name.
    Image(image::ImageArgs),
    /// Remote image repository.
    Repo(image::RepoArgs),
    /// A single infrastructure output value.
    Tf(tf::TfArgs),
}

/// Dispatches `jolt inspect <subcommand>`.
pub async fn handle_inspect(args: InspectArgs, resolver: &ConfigResolver) -> Result<()> {
    match args.command {
        InspectCommand::Db(args) => containers::handle_db(args, resolver).await,
        InspectCommand::Cache(args) => containers::handle_cache(args, resolver).await,
        InspectCommand::Compose(args) => containers::handle_compose(args, resolver).await,
        InspectCommand::Image(args) => image::handle_image(args, resolver).await,
        InspectCommand::Repo(args) => image::handle_repo(args, resolver).await,
        InspectCommand::Tf(args) => tf::handle_tf(args, resolver).await,
    }
}

/// Error for a lookup that produced nothing.
fn not_resolved(what: &str) -> anyhow::Error {
    JoltError::Config(format!("Could not determine {}", what)).into()
}
