//! # Jolt Config Command Group
//!
//! File: cli/src/commands/config/mod.rs
//!
//! ## Overview
//!
//! Entry point and router for `jolt config`. These subcommands expose what
//! the `ConfigResolver` sees, which is mostly useful when a wrapped command
//! does something unexpected and you want to know why.
//!
//! ## Examples
//!
//! ```bash
//! # Which file was loaded, and what is in it
//! jolt config list
//!
//! # Resolve one key (site-aware, interpolated)
//! jolt --site staging config get ecsCluster
//!
//! # Where does each wrapped tool come from
//! jolt config cmd docker terraform
//!
//! # Try out a template
//! jolt config parse "{conf:imageName}:{git:sha}" -p env=dev
//! ```
//!
use crate::core::error::Result;
use crate::core::resolver::ConfigResolver;
use clap::{Parser, Subcommand};

/// Implements `jolt config cmd`.
mod cmd;
/// Implements `jolt config get`.
mod get;
/// Implements `jolt config list`.
mod list;
/// Implements `jolt config parse`.
mod parse;

/// # Config Command Group Arguments (`ConfigArgs`)
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

/// # Config Subcommands (`ConfigCommand`)
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show the loaded configuration file and every key in it.
    #[command(alias = "ls")]
    List(list::ListArgs),
    /// Print the resolved value of a key.
    Get(get::GetArgs),
    /// Show which executable each logical tool resolves to, and why.
    Cmd(cmd::CmdArgs),
    /// Interpolate a template string.
    Parse(parse::ParseArgs),
}

/// Dispatches `jolt config <subcommand>`.
pub async fn handle_config(args: ConfigArgs, resolver: &ConfigResolver) -> Result<()> {
    match args.command {
        ConfigCommand::List(args) => list::handle_list(args, resolver).await,
        ConfigCommand::Get(args) => get::handle_get(args, resolver).await,
        ConfigCommand::Cmd(args) => cmd::handle_cmd(args, resolver).await,
        ConfigCommand::Parse(args) => parse::handle_parse(args, resolver).await,
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_subcommand_parsing() {
        let args = ConfigArgs::try_parse_from(["config", "get", "ecsCluster"]).unwrap();
        assert!(matches!(args.command, ConfigCommand::Get(_)));

        let args = ConfigArgs::try_parse_from(["config", "ls", "--json"]).unwrap();
        assert!(matches!(args.command, ConfigCommand::List(_)));

        let args = ConfigArgs::try_parse_from(["config", "cmd"]).unwrap();
        assert!(matches!(args.command, ConfigCommand::Cmd(_)));

        assert!(ConfigArgs::try_parse_from(["config", "bogus"]).is_err());
    }
}
