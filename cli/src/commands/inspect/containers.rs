//! # Jolt Inspect Container Handlers
//!
//! File: cli/src/commands/inspect/containers.rs
//!
//! ## Overview
//!
//! Implements `jolt inspect db`, `jolt inspect cache` and
//! `jolt inspect compose`. The first two print the containers the resolver
//! detected (or was told about via `dbContainer` / `cacheContainer`); the
//! last lists the services of the rendered compose topology.
//!
//! The database password is masked unless `--show-password` is given.
//!
use super::not_resolved;
use crate::core::containers::DbContainerInfo;
use crate::core::error::Result;
use crate::core::resolver::ConfigResolver;
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct DbArgs {
    /// Print as JSON.
    #[arg(long)]
    json: bool,
    /// Print the password instead of masking it.
    #[arg(long)]
    show_password: bool,
}

#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Print as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
pub struct ComposeArgs {
    /// Print the whole topology as JSON.
    #[arg(long)]
    json: bool,
}

const MASK: &str = "********";

pub async fn handle_db(args: DbArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("Db args: {:?}", args);
    let mut info = resolver
        .db_container_info()
        .await
        .ok_or_else(|| not_resolved("the database container"))?;
    if !args.show_password {
        info.pass = MASK.to_string();
    }

    if args.json {
        print_json(&info)?;
    } else {
        print_db(&info);
    }
    Ok(())
}

fn print_db(info: &DbContainerInfo) {
    println!("Container: {}", info.container);
    println!("Engine:    {}", info.engine.as_str());
    println!("Database:  {}", info.db);
    println!("User:      {}", info.user);
    println!("Password:  {}", info.pass);
    println!("Dump:      {}", info.dump_cmd);
    println!("Admin:     {}", info.admin_cmd);
    println!("Client:    {}", info.cli_cmd);
}

pub async fn handle_cache(args: CacheArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("Cache args: {:?}", args);
    let info = resolver
        .cache_container_info()
        .await
        .ok_or_else(|| not_resolved("the cache container"))?;

    if args.json {
        print_json(&info)?;
    } else {
        println!("Container: {}", info.container);
        println!("Engine:    {}", info.engine.as_str());
        println!("Client:    {}", info.cli_cmd);
    }
    Ok(())
}

pub async fn handle_compose(args: ComposeArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("Compose args: {:?}", args);
    // Strict: a broken compose setup should surface its error here.
    let config = resolver
        .compose_config(true)
        .await?
        .ok_or_else(|| not_resolved("the compose topology"))?;

    if args.json {
        return print_json(config);
    }

    if config.services.is_empty() {
        println!("No services defined.");
        return Ok(());
    }
    let width = config.services.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for service in &config.services {
        println!(
            "{:<width$}  {:<30}  {}",
            service.name,
            service.image.as_deref().unwrap_or("-"),
            service.container_name.as_deref().unwrap_or(""),
            width = width,
        );
    }
    if !config.volumes.is_empty() {
        println!("Volumes: {}", config.volumes.join(", "));
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", rendered);
    Ok(())
}
