//! # Jolt Inspect Terraform Handler
//!
//! File: cli/src/commands/inspect/tf.rs
//!
//! ## Overview
//!
//! Implements `jolt inspect tf <key>`. With an active site the site-prefixed
//! output (`{site}_{key}`) is tried first. `--strict` reports why the outputs
//! could not be read instead of a generic "not found".
//!
use super::not_resolved;
use crate::core::error::Result;
use crate::core::resolver::ConfigResolver;
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct TfArgs {
    /// Output name, e.g. `vpc_id`.
    key: String,
    /// Fail with the underlying error if the outputs cannot be read.
    #[arg(long)]
    strict: bool,
    /// Do not try the site-prefixed output first.
    #[arg(long)]
    no_site: bool,
}

pub async fn handle_tf(args: TfArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("Tf args: {:?}", args);
    let value = resolver
        .tf_var(&args.key, args.strict, !args.no_site)
        .await?
        .ok_or_else(|| not_resolved(&format!("infrastructure output '{}'", args.key)))?;
    println!("{}", value);
    Ok(())
}
