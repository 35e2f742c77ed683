//! # Jolt Configuration Document
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the raw configuration document Jolt reasons about. The
//! document is a flat mapping from camelCase keys to values, read once per
//! process and never written back. Resolution rules (site overrides, command
//! overrides, interpolation) live in `core::resolver`; this module only knows
//! how to find and parse the file.
//!
//! ## Architecture
//!
//! Configuration sources are tried in a fixed order, first existing file wins:
//! 1. `.jolt.json` in the working directory
//! 2. `jolt.json` in the working directory
//! 3. `.jolt.env` in the working directory
//! 4. `.env` in the working directory
//!
//! An explicit path (`--config` / `JOLT_CONFIG`) replaces the candidate list
//! entirely and must exist.
//!
//! JSON documents keep their shape: strings stay strings, arrays become
//! `ConfigValue::List`, objects become `ConfigValue::SiteMap`. Env files are
//! flat `KEY=VALUE` pairs whose keys are converted to camelCase
//! (`DB_SEED` -> `dbSeed`).
//!
//! ## Examples
//!
//! ```rust
//! let loaded = config::load_config(Path::new("."), None)?;
//! if let Some(path) = &loaded.source {
//!     println!("Using {}", path.display());
//! }
//! let cluster = loaded.document.get("ecsCluster");
//! ```
//!
use crate::core::error::{JoltError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Candidate file names, highest priority first.
pub const CONFIG_CANDIDATES: &[&str] = &[".jolt.json", "jolt.json", ".jolt.env", ".env"];

/// One entry of a list-valued config key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListEntry {
    /// A plain string entry, e.g. a path or an argument.
    Text(String),
    /// A structured command entry: `{ "cmd": "...", "args": [...] }`.
    Command {
        cmd: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

/// A single configuration value. Consumers match on the shape explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    List(Vec<ListEntry>),
    /// Site name -> (key -> value) overrides.
    SiteMap(BTreeMap<String, BTreeMap<String, String>>),
}

impl ConfigValue {
    /// Returns the string payload, if this is a plain string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts one top-level JSON value. `Ok(None)` means the key is skipped (`null`).
    fn from_json(key: &str, value: serde_json::Value) -> Result<Option<Self>> {
        use serde_json::Value;
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(ConfigValue::String(s))),
            Value::Bool(_) | Value::Number(_) => Ok(Some(ConfigValue::String(value.to_string()))),
            Value::Array(items) => {
                let mut entries = Vec::with_capacity(items.len());
                for item in items {
                    let entry = match item {
                        Value::String(s) => ListEntry::Text(s),
                        Value::Bool(_) | Value::Number(_) => ListEntry::Text(item.to_string()),
                        other => serde_json::from_value(other).map_err(|e| {
                            JoltError::Config(format!("Invalid list entry under '{}': {}", key, e))
                        })?,
                    };
                    entries.push(entry);
                }
                Ok(Some(ConfigValue::List(entries)))
            }
            Value::Object(sites) => {
                let mut map = BTreeMap::new();
                for (site, overrides) in sites {
                    let Value::Object(overrides) = overrides else {
                        return Err(JoltError::Config(format!(
                            "'{}.{}' must be an object of string values",
                            key, site
                        ))
                        .into());
                    };
                    let mut inner = BTreeMap::new();
                    for (k, v) in overrides {
                        let text = match v {
                            Value::Null => continue,
                            Value::String(s) => s,
                            Value::Bool(_) | Value::Number(_) => v.to_string(),
                            _ => {
                                return Err(JoltError::Config(format!(
                                    "'{}.{}.{}' must be a string",
                                    key, site, k
                                ))
                                .into())
                            }
                        };
                        inner.insert(k, text);
                    }
                    map.insert(site, inner);
                }
                Ok(Some(ConfigValue::SiteMap(map)))
            }
        }
    }
}

/// The flat key -> value document. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigDocument {
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses a JSON document. The root must be an object.
    pub fn from_json_str(content: &str) -> std::result::Result<Self, serde_json::Error> {
        let root: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
        let mut values = BTreeMap::new();
        for (key, value) in root {
            match ConfigValue::from_json(&key, value) {
                Ok(Some(v)) => {
                    values.insert(key, v);
                }
                Ok(None) => {}
                Err(e) => {
                    return Err(serde::de::Error::custom(e.to_string()));
                }
            }
        }
        Ok(Self { values })
    }

    /// Builds a document from env-file pairs, camelCasing each key.
    pub fn from_env_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (env_key_to_camel_case(&k), ConfigValue::String(v)))
            .collect();
        Self { values }
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigDocument {
    fn from_iter<T: IntoIterator<Item = (String, ConfigValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A document plus the file it came from (None when no file was found).
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub document: ConfigDocument,
    pub source: Option<PathBuf>,
}

/// Converts an UPPER_SNAKE env key to camelCase: `DB_SEED` -> `dbSeed`.
///
/// Only all-uppercase segments are lowercased, so a key already written in
/// camelCase (`dbSeed`) is kept as it is.
pub fn env_key_to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, part) in key.split('_').filter(|p| !p.is_empty()).enumerate() {
        let part = if part.chars().any(char::is_lowercase) {
            part.to_string()
        } else {
            part.to_lowercase()
        };
        if i == 0 {
            out.push_str(&part);
        } else {
            out.push_str(&capitalize(&part));
        }
    }
    out
}

/// Uppercases the first character: `ecsCluster` -> `EcsCluster`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Loads the configuration for `dir`, or from `explicit` when given.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(JoltError::ConfigNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        return load_config_from_path(path);
    }

    for candidate in CONFIG_CANDIDATES {
        let path = dir.join(candidate);
        if path.is_file() {
            return load_config_from_path(&path);
        }
        debug!("Config candidate not found: {}", path.display());
    }

    info!("No configuration file found in {}", dir.display());
    Ok(LoadedConfig::default())
}

fn load_config_from_path(path: &Path) -> Result<LoadedConfig> {
    info!("Loading configuration from: {}", path.display());
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let document = if is_json {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        ConfigDocument::from_json_str(&content).map_err(|source| JoltError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        let iter = dotenvy::from_path_iter(path).map_err(|source| JoltError::EnvFileParse {
            path: path.to_path_buf(),
            source,
        })?;
        let pairs = iter
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|source| JoltError::EnvFileParse {
                path: path.to_path_buf(),
                source,
            })?;
        ConfigDocument::from_env_pairs(pairs)
    };

    debug!("Loaded {} configuration keys", document.len());
    Ok(LoadedConfig {
        document,
        source: Some(path.to_path_buf()),
    })
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_env_key_to_camel_case() {
        assert_eq!(env_key_to_camel_case("DB_SEED"), "dbSeed");
        assert_eq!(env_key_to_camel_case("DOCKER_COMMAND"), "dockerCommand");
        assert_eq!(env_key_to_camel_case("ECS_CLUSTER_NAME"), "ecsClusterName");
        assert_eq!(env_key_to_camel_case("PORT"), "port");
        assert_eq!(env_key_to_camel_case("__LEADING__DOUBLE"), "leadingDouble");
        assert_eq!(env_key_to_camel_case("dbSeed"), "dbSeed");
        assert_eq!(env_key_to_camel_case("imageName"), "imageName");
        assert_eq!(env_key_to_camel_case("db_seed"), "dbSeed");
        assert_eq!(env_key_to_camel_case("AWS_profileName"), "awsProfileName");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("ecsCluster"), "EcsCluster");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_deserialize_json_document() {
        let json = r#"{
            "ecsCluster": "prod",
            "dbPort": 3306,
            "verbose": true,
            "skipped": null,
            "buildArgs": ["--pull", {"cmd": "yarn", "args": ["build"]}],
            "sites": { "staging": { "ecsCluster": "staging-val", "replicas": 2 } }
        }"#;
        let doc = ConfigDocument::from_json_str(json).expect("valid document");

        assert_eq!(doc.get("ecsCluster"), Some(&ConfigValue::String("prod".into())));
        assert_eq!(doc.get("dbPort"), Some(&ConfigValue::String("3306".into())));
        assert_eq!(doc.get("verbose"), Some(&ConfigValue::String("true".into())));
        assert!(!doc.contains_key("skipped"));
        assert_eq!(
            doc.get("buildArgs"),
            Some(&ConfigValue::List(vec![
                ListEntry::Text("--pull".into()),
                ListEntry::Command {
                    cmd: "yarn".into(),
                    args: vec!["build".into()]
                },
            ]))
        );
        let Some(ConfigValue::SiteMap(sites)) = doc.get("sites") else {
            panic!("sites should be a site map");
        };
        assert_eq!(sites["staging"]["ecsCluster"], "staging-val");
        assert_eq!(sites["staging"]["replicas"], "2");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(ConfigDocument::from_json_str("{ not json").is_err());
        assert!(ConfigDocument::from_json_str("[1, 2]").is_err());
        assert!(ConfigDocument::from_json_str(r#"{"sites": {"a": "b"}}"#).is_err());
        assert!(ConfigDocument::from_json_str(r#"{"sites": {"a": {"b": [1]}}}"#).is_err());
    }

    #[test]
    fn test_load_prefers_json_over_env() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".env"), "ECS_CLUSTER=from-env\n").unwrap();
        fs::write(dir.path().join("jolt.json"), r#"{"ecsCluster": "from-json"}"#).unwrap();

        let loaded = load_config(dir.path(), None).unwrap();
        assert_eq!(loaded.source, Some(dir.path().join("jolt.json")));
        assert_eq!(
            loaded.document.get("ecsCluster").and_then(ConfigValue::as_str),
            Some("from-json")
        );
    }

    #[test]
    fn test_load_env_file_camel_cases_keys() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(".jolt.env"),
            "# comment\nDB_SEED=seed.sql\nDOCKER_COMMAND=\"podman\"\nimageName=web\n",
        )
        .unwrap();

        let loaded = load_config(dir.path(), None).unwrap();
        assert_eq!(loaded.source, Some(dir.path().join(".jolt.env")));
        assert_eq!(
            loaded.document.get("dbSeed").and_then(ConfigValue::as_str),
            Some("seed.sql")
        );
        assert_eq!(
            loaded.document.get("dockerCommand").and_then(ConfigValue::as_str),
            Some("podman")
        );
        assert_eq!(
            loaded.document.get("imageName").and_then(ConfigValue::as_str),
            Some("web")
        );
        assert!(!loaded.document.contains_key("DB_SEED"));
    }

    #[test]
    fn test_load_without_files_is_empty() {
        let dir = tempdir().unwrap();
        let loaded = load_config(dir.path(), None).unwrap();
        assert!(loaded.source.is_none());
        assert!(loaded.document.is_empty());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("custom.json");
        let err = load_config(dir.path(), Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".jolt.json"), "{ broken").unwrap();
        let err = load_config(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON configuration"));
    }
}
