//! # Jolt Config Get Handler
//!
//! File: cli/src/commands/config/get.rs
//!
//! ## Overview
//!
//! Implements `jolt config get <key>`. Prints the value the resolver would
//! hand to a command: site overrides applied and placeholders interpolated.
//! List values are printed one entry per line. A key that is not set is an
//! error, so scripts can test for it with the exit code.
//!
use super::list::render_entry;
use crate::core::error::{JoltError, Result};
use crate::core::resolver::ConfigResolver;
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// The camelCase configuration key, e.g. `ecsCluster`.
    key: String,
    /// Print the stored value without interpolating placeholders.
    #[arg(long)]
    raw: bool,
}

pub async fn handle_get(args: GetArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("Get args: {:?}", args);

    if let Some(entries) = resolver.list(&args.key) {
        for entry in entries {
            println!("{}", render_entry(entry));
        }
        return Ok(());
    }

    let value = if args.raw {
        resolver.raw(&args.key).map(str::to_string)
    } else {
        resolver.get(&args.key).await
    };

    match value {
        Some(v) => {
            println!("{}", v);
            Ok(())
        }
        None if resolver.has(&args.key) => Err(JoltError::Config(format!(
            "'{}' is not a plain value",
            args.key
        ))
        .into()),
        None => Err(JoltError::Config(format!("'{}' is not set", args.key)).into()),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_args() {
        let args = GetArgs::try_parse_from(["get", "imageName", "--raw"]).unwrap();
        assert_eq!(args.key, "imageName");
        assert!(args.raw);
        assert!(GetArgs::try_parse_from(["get"]).is_err());
    }
}
