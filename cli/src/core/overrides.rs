//! # Jolt Command Overrides
//!
//! File: cli/src/core/overrides.rs
//!
//! ## Overview
//!
//! Jolt never hardcodes the executables it wraps. Each logical tool name
//! (`docker`, `compose`, `terraform`, ...) maps to a built-in default and to an
//! environment variable that can replace it. This module holds that fixed
//! table and the `CommandOverride` record describing where a resolved command
//! came from. The actual lookup (environment snapshot, config document) is done
//! by `ConfigResolver::command_override`.
//!
//! Resolution order, first match wins:
//! 1. `JOLT_<VAR>` environment variable
//! 2. `<VAR>` environment variable
//! 3. config key `camelCase(<VAR>)`, e.g. `dockerCommand`
//! 4. built-in default
//!
use serde::Serialize;
use std::fmt;

/// How the default executable for a tool is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCommand {
    Fixed(&'static str),
    /// `tofu` when it is on PATH, otherwise `terraform`.
    TofuOrTerraform,
}

/// One row of the logical command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub env_var: &'static str,
    pub default: DefaultCommand,
}

/// The fixed set of logical tools Jolt knows about.
pub static TOOL_TABLE: &[ToolSpec] = &[
    ToolSpec {
        name: "docker",
        aliases: &[],
        env_var: "DOCKER_COMMAND",
        default: DefaultCommand::Fixed("docker"),
    },
    ToolSpec {
        name: "compose",
        aliases: &["docker-compose"],
        env_var: "COMPOSE_COMMAND",
        default: DefaultCommand::Fixed("docker compose"),
    },
    ToolSpec {
        name: "terraform",
        aliases: &["tofu"],
        env_var: "TERRAFORM_COMMAND",
        default: DefaultCommand::TofuOrTerraform,
    },
    ToolSpec {
        name: "node",
        aliases: &[],
        env_var: "NODE_COMMAND",
        default: DefaultCommand::Fixed("node"),
    },
    ToolSpec {
        name: "yarn",
        aliases: &[],
        env_var: "YARN_COMMAND",
        default: DefaultCommand::Fixed("yarn"),
    },
    ToolSpec {
        name: "aws",
        aliases: &[],
        env_var: "AWS_COMMAND",
        default: DefaultCommand::Fixed("aws"),
    },
    ToolSpec {
        name: "ssh",
        aliases: &[],
        env_var: "SSH_COMMAND",
        default: DefaultCommand::Fixed("ssh"),
    },
    ToolSpec {
        name: "rsync",
        aliases: &[],
        env_var: "RSYNC_COMMAND",
        default: DefaultCommand::Fixed("rsync"),
    },
    ToolSpec {
        name: "git",
        aliases: &[],
        env_var: "GIT_COMMAND",
        default: DefaultCommand::Fixed("git"),
    },
    ToolSpec {
        name: "gzip",
        aliases: &[],
        env_var: "GZIP_COMMAND",
        default: DefaultCommand::Fixed("gzip"),
    },
];

/// Finds a tool by its name or one of its aliases.
pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    TOOL_TABLE
        .iter()
        .find(|tool| tool.name == name || tool.aliases.contains(&name))
}

/// Where a resolved command string came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum OverrideSource {
    /// An environment variable (holds the variable name).
    Env(String),
    /// A configuration key (holds the key).
    Config(String),
    Default,
    /// The name is not in the tool table and resolves to itself.
    Unknown,
}

impl fmt::Display for OverrideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideSource::Env(var) => write!(f, "env ${}", var),
            OverrideSource::Config(key) => write!(f, "config {}", key),
            OverrideSource::Default => write!(f, "default"),
            OverrideSource::Unknown => write!(f, "unknown"),
        }
    }
}

/// The result of resolving a logical tool name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOverride {
    pub name: String,
    pub command: String,
    pub source: OverrideSource,
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tool_by_alias() {
        assert_eq!(find_tool("tofu").map(|t| t.name), Some("terraform"));
        assert_eq!(find_tool("docker-compose").map(|t| t.name), Some("compose"));
        assert_eq!(find_tool("gzip").map(|t| t.env_var), Some("GZIP_COMMAND"));
        assert!(find_tool("kubectl").is_none());
    }

    #[test]
    fn test_env_vars_are_unique() {
        let mut vars: Vec<_> = TOOL_TABLE.iter().map(|t| t.env_var).collect();
        vars.sort_unstable();
        vars.dedup();
        assert_eq!(vars.len(), TOOL_TABLE.len());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(
            OverrideSource::Env("JOLT_DOCKER_COMMAND".into()).to_string(),
            "env $JOLT_DOCKER_COMMAND"
        );
        assert_eq!(
            OverrideSource::Config("dockerCommand".into()).to_string(),
            "config dockerCommand"
        );
        assert_eq!(OverrideSource::Default.to_string(), "default");
    }
}
