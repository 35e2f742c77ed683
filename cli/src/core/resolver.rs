//! # Jolt Configuration Resolver
//!
//! File: cli/src/core/resolver.rs
//!
//! ## Overview
//!
//! `ConfigResolver` is the one object every command handler asks for values.
//! It wraps the immutable `ConfigDocument` and layers resolution rules on top:
//!
//! - **Site-scoped lookup** (`get`, `has`): with an active site, the
//!   `sites.<site>.<key>` entry wins, then the flat `{site}{Key}` key, then the
//!   plain key. Values are interpolated on the way out.
//! - **Command resolution** (`command`, `command_override`): logical tool names
//!   to executables, honouring `JOLT_<VAR>`, `<VAR>`, config and defaults.
//! - **Infrastructure outputs** (`tf_var`): `terraform output -json`, fetched
//!   at most once per resolver.
//! - **Container topology** (`compose_config`): `compose config --format json`,
//!   fetched at most once per resolver.
//! - **Derived lookups**: image names, image repositories, database and cache
//!   containers.
//! - **Interpolation** (`parse_arg`): `{type:name}` placeholders, resolved
//!   concurrently and spliced back in order.
//!
//! ## Architecture
//!
//! The resolver is built once in `main` and handed to command handlers by
//! reference. It never writes to the document. Everything computed is held
//! in per-instance `OnceCell` slots with three states: not attempted,
//! attempted and unavailable, attempted and present. A failed fetch is cached
//! like a successful one, so a missing tool is invoked once, not once per
//! lookup.
//!
//! External processes are reached through the `ToolRunner` trait and the
//! process environment is a snapshot taken at construction, so tests can
//! inject both.
//!
//! ## Failure semantics
//!
//! "Not found" is always `None`. Tool failures are swallowed into `None`
//! unless the caller passes `throw_on_fail`, in which case a
//! `JoltError::ToolUnavailable` is returned.
//!
use crate::common::process::{self, display_command, split_command, SystemRunner, ToolRunner};
use crate::core::config::{
    self, capitalize, env_key_to_camel_case, ConfigDocument, ConfigValue, ListEntry, LoadedConfig,
};
use crate::core::containers::{
    CacheContainerInfo, CacheEngine, ComposeConfig, DbContainerInfo, DbCredentials, DbEngine,
};
use crate::core::error::{JoltError, Result};
use crate::core::overrides::{find_tool, CommandOverride, DefaultCommand, OverrideSource, TOOL_TABLE};
use crate::core::templating::{self, Placeholder, PlaceholderKind};
use futures_util::future::{join_all, BoxFuture, FutureExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Nested `{conf:...}` expansion stops at this depth, cycle or not.
pub const MAX_INTERPOLATION_DEPTH: usize = 16;

/// Key holding the per-site override map.
const SITES_KEY: &str = "sites";

/// Outcome of a one-shot external fetch.
#[derive(Debug, Clone)]
enum Fetched<T> {
    Present(T),
    Unavailable(String),
}

impl<T> Fetched<T> {
    fn from_result(what: &str, result: Result<T>) -> Self {
        match result {
            Ok(v) => Fetched::Present(v),
            Err(e) => {
                debug!("{} unavailable: {:#}", what, e);
                Fetched::Unavailable(format!("{:#}", e))
            }
        }
    }

    fn get(&self, tool: &str, throw_on_fail: bool) -> Result<Option<&T>> {
        match self {
            Fetched::Present(v) => Ok(Some(v)),
            Fetched::Unavailable(reason) if throw_on_fail => Err(JoltError::ToolUnavailable {
                tool: tool.to_string(),
                reason: reason.clone(),
            }
            .into()),
            Fetched::Unavailable(_) => Ok(None),
        }
    }
}

/// A raw lookup hit, before interpolation.
enum Found<'a> {
    SiteEntry(&'a str),
    Value(&'a ConfigValue),
}

/// Layered, memoizing view over the configuration document.
pub struct ConfigResolver {
    document: ConfigDocument,
    source: Option<PathBuf>,
    site: Option<String>,
    env: HashMap<String, String>,
    runner: Arc<dyn ToolRunner>,
    compose: OnceCell<Fetched<ComposeConfig>>,
    tf_outputs: OnceCell<Fetched<HashMap<String, String>>>,
    git_head: OnceCell<Fetched<String>>,
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("source", &self.source)
            .field("site", &self.site)
            .field("keys", &self.document.len())
            .finish_non_exhaustive()
    }
}

impl ConfigResolver {
    /// Builds a resolver from an already loaded document.
    pub fn new(
        loaded: LoadedConfig,
        env: HashMap<String, String>,
        runner: Arc<dyn ToolRunner>,
    ) -> Self {
        Self {
            document: loaded.document,
            source: loaded.source,
            site: None,
            env,
            runner,
            compose: OnceCell::new(),
            tf_outputs: OnceCell::new(),
            git_head: OnceCell::new(),
        }
    }

    /// Loads the configuration for `dir` (or `explicit`) against the real
    /// process environment and real subprocesses. Called once, from `main`.
    pub fn load(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let loaded = config::load_config(dir, explicit)?;
        Ok(Self::new(
            loaded,
            std::env::vars().collect(),
            Arc::new(SystemRunner),
        ))
    }

    /// Activates a site. Empty strings clear it.
    pub fn set_site(&mut self, site: Option<String>) {
        self.site = site.filter(|s| !s.is_empty());
        if let Some(site) = &self.site {
            debug!("Active site: {}", site);
        }
    }

    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    /// The file the document was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    // --- Key lookup ---

    fn find(&self, key: &str) -> Option<Found<'_>> {
        if let Some(site) = &self.site {
            if let Some(ConfigValue::SiteMap(sites)) = self.document.get(SITES_KEY) {
                if let Some(value) = sites.get(site).and_then(|o| o.get(key)) {
                    return Some(Found::SiteEntry(value));
                }
            }
            let site_key = format!("{}{}", site, capitalize(key));
            if let Some(value) = self.document.get(&site_key) {
                return Some(Found::Value(value));
            }
        }
        self.document.get(key).map(Found::Value)
    }

    /// The uninterpolated string for `key`, following site precedence.
    pub fn raw(&self, key: &str) -> Option<&str> {
        match self.find(key)? {
            Found::SiteEntry(s) => Some(s),
            Found::Value(v) => v.as_str(),
        }
    }

    /// The list stored under `key`, following site precedence.
    pub fn list(&self, key: &str) -> Option<&[ListEntry]> {
        match self.find(key)? {
            Found::Value(ConfigValue::List(entries)) => Some(entries),
            _ => None,
        }
    }

    /// Whether `key` resolves to anything, following site precedence.
    pub fn has(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// The interpolated string value of `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.get_within(key, &[]).await
    }

    /// `get` while the keys in `expanding` are being interpolated. A key that
    /// is already being expanded reads as absent, so its placeholder stays verbatim.
    async fn get_within(&self, key: &str, expanding: &[String]) -> Option<String> {
        if expanding.iter().any(|k| k == key) {
            warn!(
                "Config key '{}' refers back to itself ({} -> {}), leaving it unexpanded",
                key,
                expanding.join(" -> "),
                key
            );
            return None;
        }
        let raw = self.raw(key)?.to_string();
        let mut chain = expanding.to_vec();
        chain.push(key.to_string());
        let no_params = HashMap::new();
        Some(self.interpolate(&raw, &no_params, &chain).await)
    }

    // --- Command resolution ---

    /// Resolves a logical tool name, with provenance.
    pub fn command_override(&self, name: &str) -> CommandOverride {
        let Some(tool) = find_tool(name) else {
            return CommandOverride {
                name: name.to_string(),
                command: name.to_string(),
                source: OverrideSource::Unknown,
            };
        };

        let prefixed = format!("JOLT_{}", tool.env_var);
        for var in [prefixed.as_str(), tool.env_var] {
            if let Some(value) = self.env.get(var).filter(|v| !v.is_empty()) {
                return CommandOverride {
                    name: name.to_string(),
                    command: value.clone(),
                    source: OverrideSource::Env(var.to_string()),
                };
            }
        }

        let key = env_key_to_camel_case(tool.env_var);
        if let Some(value) = self.raw(&key).filter(|v| !v.is_empty()) {
            return CommandOverride {
                name: name.to_string(),
                command: value.to_string(),
                source: OverrideSource::Config(key),
            };
        }

        let command = match tool.default {
            DefaultCommand::Fixed(cmd) => cmd.to_string(),
            DefaultCommand::TofuOrTerraform => {
                if self.runner.is_on_path("tofu") {
                    "tofu".to_string()
                } else {
                    "terraform".to_string()
                }
            }
        };
        CommandOverride {
            name: name.to_string(),
            command,
            source: OverrideSource::Default,
        }
    }

    /// The executable string for a logical tool name.
    pub fn command(&self, name: &str) -> String {
        self.command_override(name).command
    }

    /// Overrides for every tool in the table, in table order.
    pub fn known_command_overrides(&self) -> Vec<CommandOverride> {
        TOOL_TABLE
            .iter()
            .map(|tool| self.command_override(tool.name))
            .collect()
    }

    /// Whether the program part of a resolved command is on PATH.
    pub fn is_available(&self, command: &str) -> bool {
        match split_command(command) {
            Ok((program, _)) => self.runner.is_on_path(&program),
            Err(_) => false,
        }
    }

    /// Runs `<tool> extra...` through the runner and requires success.
    async fn capture_tool(&self, tool: &str, extra: &[&str]) -> Result<String> {
        let (program, mut args) = split_command(&self.command(tool))?;
        args.extend(extra.iter().map(|s| s.to_string()));
        let output = self.runner.capture(&program, &args).await?;
        let output = process::ensure_success(&program, &args, output)?;
        Ok(output.stdout)
    }

    // --- Infrastructure outputs ---

    async fn tf_outputs(&self) -> &Fetched<HashMap<String, String>> {
        self.tf_outputs
            .get_or_init(|| async {
                let result = self.fetch_tf_outputs().await;
                Fetched::from_result("terraform outputs", result)
            })
            .await
    }

    async fn fetch_tf_outputs(&self) -> Result<HashMap<String, String>> {
        let stdout = self.capture_tool("terraform", &["output", "-json"]).await?;
        let outputs = parse_tf_outputs(&stdout).map_err(|source| JoltError::InvalidToolOutput {
            cmd: display_command(&self.command("terraform"), &["output".into(), "-json".into()]),
            source,
        })?;
        debug!("Loaded {} terraform outputs", outputs.len());
        Ok(outputs)
    }

    async fn lookup_tf_output(&self, key: &str, throw_on_fail: bool) -> Result<Option<String>> {
        let outputs = self.tf_outputs().await.get("terraform outputs", throw_on_fail)?;
        Ok(outputs.and_then(|o| o.get(key).cloned()))
    }

    /// Looks up an infrastructure output. With an active site and `try_site`,
    /// `{site}_{key}` is tried first (never strictly).
    pub async fn tf_var(&self, key: &str, throw_on_fail: bool, try_site: bool) -> Result<Option<String>> {
        if try_site {
            if let Some(site) = &self.site {
                let site_key = format!("{}_{}", site, key);
                if let Some(value) = self.lookup_tf_output(&site_key, false).await? {
                    return Ok(Some(value));
                }
            }
        }
        self.lookup_tf_output(key, throw_on_fail).await
    }

    /// Non-strict, site-aware `tf_var`.
    pub async fn tf(&self, key: &str) -> Option<String> {
        self.tf_var(key, false, true).await.ok().flatten()
    }

    // --- Container topology ---

    /// The rendered compose topology, fetched once per resolver.
    pub async fn compose_config(&self, throw_on_fail: bool) -> Result<Option<&ComposeConfig>> {
        self.compose
            .get_or_init(|| async {
                let result = self.fetch_compose_config().await;
                Fetched::from_result("compose config", result)
            })
            .await
            .get("compose config", throw_on_fail)
    }

    async fn fetch_compose_config(&self) -> Result<ComposeConfig> {
        let stdout = self
            .capture_tool("compose", &["config", "--format", "json"])
            .await?;
        let config = ComposeConfig::from_json(&stdout).map_err(|source| JoltError::InvalidToolOutput {
            cmd: format!("{} config --format json", self.command("compose")),
            source,
        })?;
        debug!("Compose topology has {} services", config.services.len());
        Ok(config)
    }

    async fn compose(&self) -> Option<&ComposeConfig> {
        self.compose_config(false).await.ok().flatten()
    }

    // --- Version control ---

    /// Full hash of HEAD, fetched once per resolver.
    pub async fn git_head(&self) -> Option<String> {
        let fetched = self
            .git_head
            .get_or_init(|| async {
                let result = self
                    .capture_tool("git", &["rev-parse", "HEAD"])
                    .await
                    .map(|out| out.trim().to_string())
                    .and_then(|sha| {
                        if sha.is_empty() {
                            Err(JoltError::Config("git rev-parse returned nothing".into()).into())
                        } else {
                            Ok(sha)
                        }
                    });
                Fetched::from_result("git HEAD", result)
            })
            .await;
        fetched.get("git HEAD", false).ok().flatten().cloned()
    }

    async fn git_value(&self, key: &str) -> Option<String> {
        match key {
            "sha" | "shortSha" => {
                let head = self.git_head().await?;
                Some(head.chars().take(8).collect())
            }
            "longSha" | "fullSha" => self.git_head().await,
            _ => None,
        }
    }

    // --- Derived lookups ---

    /// Docker image name. Prod: `imageName` -> tf `image_name`.
    /// Dev: `devImageName` -> tf `dev_image_name` -> `{prod}-dev`.
    pub async fn docker_image_name(&self, dev: bool) -> Option<String> {
        if !dev {
            return self.prod_image_name().await;
        }
        if let Some(name) = self.get("devImageName").await {
            return Some(name);
        }
        if let Some(name) = self.tf("dev_image_name").await {
            return Some(name);
        }
        let prod = self.prod_image_name().await?;
        Some(format!("{}-dev", prod))
    }

    async fn prod_image_name(&self) -> Option<String> {
        match self.get("imageName").await {
            Some(name) => Some(name),
            None => self.tf("image_name").await,
        }
    }

    /// Remote registry repository. `imageRepository` / `devImageRepository`
    /// -> tf `image_repository_url` / `dev_image_repository_url`.
    pub async fn image_repository(&self, dev: bool) -> Option<String> {
        let (key, output) = if dev {
            ("devImageRepository", "dev_image_repository_url")
        } else {
            ("imageRepository", "image_repository_url")
        };
        match self.get(key).await {
            Some(repo) => Some(repo),
            None => self.tf(output).await,
        }
    }

    /// Database container details. Absent unless db, user and pass are all known.
    pub async fn db_container_info(&self) -> Option<DbContainerInfo> {
        self.db_container_info_within(&[]).await
    }

    async fn db_container_info_within(&self, expanding: &[String]) -> Option<DbContainerInfo> {
        let explicit_engine = self
            .get_within("dbType", expanding)
            .await
            .and_then(|t| DbEngine::from_name(&t));

        let db_container = self.get_within("dbContainer", expanding).await;
        let (container, service_engine, service_env) = match db_container {
            Some(container) => {
                let service = self.compose().await.and_then(|c| c.service(&container));
                let engine = service
                    .and_then(|s| s.image.as_deref())
                    .and_then(DbEngine::from_image);
                (container, engine, service.map(|s| &s.environment))
            }
            None => {
                let (service, engine) = self.compose().await?.find_db_service()?;
                (service.name.clone(), Some(engine), Some(&service.environment))
            }
        };

        let Some(engine) = explicit_engine.or(service_engine) else {
            debug!("No database engine known for container '{}'", container);
            return None;
        };

        let from_env = service_env
            .map(|env| DbCredentials::from_environment(engine, env))
            .unwrap_or_default();
        let db = self.get_within("dbName", expanding).await.or(from_env.db);
        let user = self.get_within("dbUser", expanding).await.or(from_env.user);
        let pass = self.get_within("dbPass", expanding).await.or(from_env.pass);

        let (Some(db), Some(user), Some(pass)) = (db, user, pass) else {
            debug!("Incomplete credentials for database container '{}'", container);
            return None;
        };

        Some(DbContainerInfo {
            container,
            engine,
            db,
            user,
            pass,
            dump_cmd: engine.dump_cmd().to_string(),
            admin_cmd: engine.admin_cmd().to_string(),
            cli_cmd: engine.cli_cmd().to_string(),
        })
    }

    /// Cache container details: `cacheContainer` / `redisContainer`, else image detection.
    pub async fn cache_container_info(&self) -> Option<CacheContainerInfo> {
        let explicit = match self.get("cacheContainer").await {
            Some(c) => Some(c),
            None => self.get("redisContainer").await,
        };
        let explicit_engine = self
            .get("cacheType")
            .await
            .and_then(|t| CacheEngine::from_name(&t));

        let (container, detected) = match explicit {
            Some(container) => {
                let engine = self
                    .compose()
                    .await
                    .and_then(|c| c.service(&container))
                    .and_then(|s| s.image.as_deref())
                    .and_then(CacheEngine::from_image);
                (container, engine)
            }
            None => {
                let (service, engine) = self.compose().await?.find_cache_service()?;
                (service.name.clone(), Some(engine))
            }
        };

        let engine = explicit_engine.or(detected).unwrap_or(CacheEngine::Redis);
        Some(CacheContainerInfo {
            container,
            engine,
            cli_cmd: engine.cli_cmd().to_string(),
        })
    }

    // --- Interpolation ---

    /// Replaces every `{type:name}` placeholder in `text`. Never fails:
    /// unresolved placeholders are left as they are.
    pub async fn parse_arg(&self, text: &str, params: &HashMap<String, String>) -> String {
        self.interpolate(text, params, &[]).await
    }

    fn interpolate<'a>(
        &'a self,
        text: &'a str,
        params: &'a HashMap<String, String>,
        expanding: &'a [String],
    ) -> BoxFuture<'a, String> {
        async move {
            let placeholders = templating::find_placeholders(text);
            if placeholders.is_empty() {
                return text.to_string();
            }
            if expanding.len() > MAX_INTERPOLATION_DEPTH {
                warn!(
                    "Interpolation depth {} exceeded, leaving '{}' unexpanded",
                    MAX_INTERPOLATION_DEPTH, text
                );
                return text.to_string();
            }

            let lookups = placeholders
                .iter()
                .map(|p| self.resolve_placeholder(p, params, expanding));
            let resolved = join_all(lookups).await;
            templating::splice(text, &placeholders, &resolved)
        }
        .boxed()
    }

    async fn resolve_placeholder(
        &self,
        placeholder: &Placeholder,
        params: &HashMap<String, String>,
        expanding: &[String],
    ) -> Option<String> {
        let name = placeholder.name.as_str();
        let value = match placeholder.kind {
            PlaceholderKind::Arg => params.get(name).cloned(),
            PlaceholderKind::Cmd => Some(self.command(name)),
            PlaceholderKind::Db => self
                .db_container_info_within(expanding)
                .await
                .and_then(|info| info.placeholder_value(name)),
            PlaceholderKind::Tf => self.tf(name).await,
            PlaceholderKind::Conf => self.get_within(name, expanding).await,
            PlaceholderKind::Git => self.git_value(name).await,
        };
        if value.is_none() {
            debug!("Placeholder {:?}:{} left unresolved", placeholder.kind, name);
        }
        value
    }
}

#[derive(Deserialize)]
struct TfOutput {
    value: serde_json::Value,
}

/// Flattens `terraform output -json` into name -> string.
pub fn parse_tf_outputs(json: &str) -> serde_json::Result<HashMap<String, String>> {
    let raw: HashMap<String, TfOutput> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, output)| {
            let value = match output.value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            Some((name, value))
        })
        .collect())
}
