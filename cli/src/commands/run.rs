//! # Jolt Run Command
//!
//! File: cli/src/commands/run.rs
//!
//! ## Overview
//!
//! Implements `jolt run <tool> [-- args...]`. The logical tool name is
//! resolved to an executable (env override, config key or default), every
//! argument is interpolated, and the result is run with inherited stdio.
//! The child's exit code becomes Jolt's exit code.
//!
//! ## Examples
//!
//! ```bash
//! # Uses $DOCKER_COMMAND / dockerCommand if set, plain docker otherwise
//! jolt run docker -- build -t {conf:imageName}:{git:sha} .
//!
//! # Template parameters
//! jolt run aws -p bucket=assets -- s3 ls s3://{arg:bucket}
//!
//! # Show what would run without running it
//! jolt run terraform --dry-run -- plan -var site={conf:site}
//! ```
//!
use crate::commands::parse_key_val;
use crate::common::process::{self, display_command, split_command};
use crate::core::error::{JoltError, Result};
use crate::core::resolver::ConfigResolver;
use clap::Parser;
use futures_util::future::join_all;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Logical tool name (docker, compose, terraform, aws, ...) or any program.
    name: String,
    /// Values for {arg:NAME} placeholders.
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    params: Vec<(String, String)>,
    /// Print the resolved command line instead of running it.
    #[arg(long)]
    dry_run: bool,
    /// Arguments passed to the tool after interpolation.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

pub async fn handle_run(args: RunArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("Run args: {:?}", args);

    let resolved = resolver.command_override(&args.name);
    debug!("'{}' resolved to '{}' ({})", resolved.name, resolved.command, resolved.source);
    let (program, mut argv) = split_command(&resolved.command)?;

    let params: HashMap<String, String> = args.params.into_iter().collect();
    let interpolated = join_all(args.args.iter().map(|a| resolver.parse_arg(a, &params))).await;
    argv.extend(interpolated);

    let rendered = display_command(&program, &argv);
    if args.dry_run {
        println!("{}", rendered);
        return Ok(());
    }

    info!("Running: {}", rendered);
    let code = process::run_streamed(&program, &argv).await?;
    if code != 0 {
        return Err(JoltError::ExitStatus { cmd: rendered, code }.into());
    }
    Ok(())
}
