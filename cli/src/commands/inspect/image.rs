//! # Jolt Inspect Image Handlers
//!
//! File: cli/src/commands/inspect/image.rs
//!
//! ## Overview
//!
//! Implements `jolt inspect image` and `jolt inspect repo`. Names come from
//! config first, then infrastructure outputs; a development image with no
//! explicit name falls back to `{prod}-dev`.
//!
use super::not_resolved;
use crate::core::error::Result;
use crate::core::resolver::ConfigResolver;
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct ImageArgs {
    /// Resolve the development image.
    #[arg(long)]
    dev: bool,
}

#[derive(Parser, Debug)]
pub struct RepoArgs {
    /// Resolve the development repository.
    #[arg(long)]
    dev: bool,
}

pub async fn handle_image(args: ImageArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("Image args: {:?}", args);
    let name = resolver
        .docker_image_name(args.dev)
        .await
        .ok_or_else(|| not_resolved("the image name"))?;
    println!("{}", name);
    Ok(())
}

pub async fn handle_repo(args: RepoArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("Repo args: {:?}", args);
    let repo = resolver
        .image_repository(args.dev)
        .await
        .ok_or_else(|| not_resolved("the image repository"))?;
    println!("{}", repo);
    Ok(())
}
