//! # Jolt Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the Jolt CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the configuration once and building the `ConfigResolver`
//! - Routing execution to the appropriate command handler
//!
//! ## Architecture
//!
//! - Each top-level command (`config`, `inspect`, `run`) is a variant in the `Commands` enum
//! - The resolver is owned here and lent to handlers by reference; nothing
//!   else loads configuration
//! - All errors are propagated to this level for consistent handling
//!
//! ## Examples
//!
//! ```bash
//! # Show where configuration came from and what it contains
//! jolt config list
//!
//! # Resolve a value for the staging site
//! jolt --site staging config get ecsCluster
//!
//! # Run docker (or its override) with interpolated arguments
//! jolt -v run docker -- build -t {conf:imageName}:{git:sha} .
//! ```
//!
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command groups (config, inspect, run)
mod common; // Shared utilities (process execution, PATH lookups)
mod core; // Configuration engine (document, resolver, templating, errors)

use crate::core::error::{JoltError, Result};
use crate::core::resolver::ConfigResolver;

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "jolt",
    about = "Jolt: one command surface over your project's dev and ops tools",
    long_about = "Wraps docker, compose, terraform/tofu, aws, git and friends behind one CLI,\n\
                  driven by a project configuration file (.jolt.json or .env).",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Active site; site-specific config keys and terraform outputs take precedence.
    #[arg(long, global = true, env = "JOLT_SITE")]
    site: Option<String>,
    /// Explicit configuration file, replacing the default search.
    #[arg(long, global = true, env = "JOLT_CONFIG")]
    config: Option<String>,
}

/// Enum defining all available top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    #[command(alias = "c")]
    Config(commands::config::ConfigArgs),
    #[command(alias = "i")]
    Inspect(commands::inspect::InspectArgs),
    #[command(alias = "r")]
    Run(commands::run::RunArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run_cli(cli).await {
        // A wrapped tool failing is relayed with its own exit code; it already printed its output.
        if let Some(JoltError::ExitStatus { cmd, code }) = e.downcast_ref::<JoltError>() {
            tracing::debug!("'{}' exited with {}", cmd, code);
            std::process::exit(*code);
        }
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Builds the resolver and dispatches to the selected command.
async fn run_cli(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let explicit = cli
        .config
        .as_deref()
        .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()));

    let mut resolver = ConfigResolver::load(&cwd, explicit.as_deref())
        .context("Failed to load Jolt configuration")?;
    resolver.set_site(cli.site);

    match cli.command {
        Commands::Config(args) => commands::config::handle_config(args, &resolver).await,
        Commands::Inspect(args) => commands::inspect::handle_inspect(args, &resolver).await,
        Commands::Run(args) => commands::run::handle_run(args, &resolver).await,
    }
}
