//! # Jolt Config Cmd Handler
//!
//! File: cli/src/commands/config/cmd.rs
//!
//! ## Overview
//!
//! Implements `jolt config cmd [names...]`. For each logical tool (all known
//! tools when no names are given) prints the resolved executable, where it
//! came from (env variable, config key or default), and whether its program
//! is on PATH.
//!
//! ```bash
//! $ jolt config cmd docker terraform
//! docker     podman     env $DOCKER_COMMAND   available
//! terraform  terraform  default               missing
//! ```
//!
use crate::core::error::Result;
use crate::core::overrides::CommandOverride;
use crate::core::resolver::ConfigResolver;
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct CmdArgs {
    /// Logical tool names (e.g. docker, compose, terraform). Defaults to all known tools.
    names: Vec<String>,
    /// Print as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct CmdReport {
    #[serde(flatten)]
    resolved: CommandOverride,
    available: bool,
}

pub async fn handle_cmd(args: CmdArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("Cmd args: {:?}", args);

    let overrides = if args.names.is_empty() {
        resolver.known_command_overrides()
    } else {
        args.names
            .iter()
            .map(|name| resolver.command_override(name))
            .collect()
    };

    let reports: Vec<CmdReport> = overrides
        .into_iter()
        .map(|resolved| {
            let available = resolver.is_available(&resolved.command);
            CmdReport {
                resolved,
                available,
            }
        })
        .collect();

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&reports).context("Failed to serialize command report")?;
        println!("{}", rendered);
        return Ok(());
    }

    let name_width = reports.iter().map(|r| r.resolved.name.len()).max().unwrap_or(0);
    let cmd_width = reports
        .iter()
        .map(|r| r.resolved.command.len())
        .max()
        .unwrap_or(0);
    for report in &reports {
        let source = report.resolved.source.to_string();
        println!(
            "{:<nw$}  {:<cw$}  {:<22}  {}",
            report.resolved.name,
            report.resolved.command,
            source,
            if report.available { "available" } else { "missing" },
            nw = name_width,
            cw = cmd_width,
        );
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_args() {
        let args = CmdArgs::try_parse_from(["cmd", "docker", "tofu", "--json"]).unwrap();
        assert_eq!(args.names, vec!["docker", "tofu"]);
        assert!(args.json);

        let args = CmdArgs::try_parse_from(["cmd"]).unwrap();
        assert!(args.names.is_empty());
    }
}
