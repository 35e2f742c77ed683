//! # Jolt Config List Handler
//!
//! File: cli/src/commands/config/list.rs
//!
//! ## Overview
//!
//! Implements `jolt config list`: prints the file the configuration came from,
//! the active site, and every key with its raw (uninterpolated) value. With
//! `--json` the document is printed as JSON instead.
//!
use crate::core::config::{ConfigValue, ListEntry};
use crate::core::error::Result;
use crate::core::resolver::ConfigResolver;
use anyhow::Context;
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print the raw document as JSON.
    #[arg(long)]
    json: bool,
}

pub async fn handle_list(args: ListArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("List args: {:?}", args);

    if args.json {
        let rendered = serde_json::to_string_pretty(resolver.document())
            .context("Failed to serialize configuration")?;
        println!("{}", rendered);
        return Ok(());
    }

    match resolver.source() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none found)"),
    }
    if let Some(site) = resolver.site() {
        println!("Active site: {}", site);
    }

    let doc = resolver.document();
    if doc.is_empty() {
        println!("No configuration keys defined.");
        return Ok(());
    }

    let width = doc.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in doc.iter() {
        println!("{:<width$}  {}", key, render_value(value), width = width);
    }
    Ok(())
}

/// One-line rendering of a config value.
fn render_value(value: &ConfigValue) -> String {
    match value {
        ConfigValue::String(s) => s.clone(),
        ConfigValue::List(entries) => {
            let items: Vec<String> = entries.iter().map(render_entry).collect();
            format!("[{}]", items.join(", "))
        }
        ConfigValue::SiteMap(sites) => {
            let names: Vec<&str> = sites.keys().map(String::as_str).collect();
            format!("<sites: {}>", names.join(", "))
        }
    }
}

pub(crate) fn render_entry(entry: &ListEntry) -> String {
    match entry {
        ListEntry::Text(s) => s.clone(),
        ListEntry::Command { cmd, args } if args.is_empty() => cmd.clone(),
        ListEntry::Command { cmd, args } => format!("{} {}", cmd, args.join(" ")),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&ConfigValue::String("x".into())), "x");
        assert_eq!(
            render_value(&ConfigValue::List(vec![
                ListEntry::Text("a".into()),
                ListEntry::Command {
                    cmd: "yarn".into(),
                    args: vec!["build".into()]
                },
            ])),
            "[a, yarn build]"
        );
        let sites = BTreeMap::from([
            ("prod".to_string(), BTreeMap::new()),
            ("staging".to_string(), BTreeMap::new()),
        ]);
        assert_eq!(
            render_value(&ConfigValue::SiteMap(sites)),
            "<sites: prod, staging>"
        );
    }

    #[test]
    fn test_list_args() {
        let args = ListArgs::try_parse_from(["list", "--json"]).unwrap();
        assert!(args.json);
    }
}
