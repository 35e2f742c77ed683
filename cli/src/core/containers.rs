//! # Jolt Container Topology
//!
//! File: cli/src/core/containers.rs
//!
//! ## Overview
//!
//! Types for the output of `compose config --format json` and for the database
//! and cache containers Jolt detects in it.
//!
//! Services keep their declaration order. Detection scans them in that order
//! and the first service whose image matches a known engine wins; there is no
//! further tie-break.
//!
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

static DB_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(mariadb|mysql)").expect("db image pattern is valid"));

static CACHE_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(redis|valkey)").expect("cache image pattern is valid"));

/// One service from the rendered compose document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComposeService {
    pub name: String,
    pub image: Option<String>,
    pub container_name: Option<String>,
    pub environment: BTreeMap<String, String>,
    pub volumes: Vec<Value>,
}

/// The rendered compose topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComposeConfig {
    /// Services in declaration order.
    pub services: Vec<ComposeService>,
    /// Names of top-level volumes.
    pub volumes: Vec<String>,
}

#[derive(Deserialize)]
struct RawCompose {
    #[serde(default)]
    services: serde_json::Map<String, Value>,
    #[serde(default)]
    volumes: Option<serde_json::Map<String, Value>>,
}

#[derive(Deserialize)]
struct RawService {
    image: Option<String>,
    container_name: Option<String>,
    #[serde(default)]
    environment: Option<RawEnvironment>,
    #[serde(default)]
    volumes: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnvironment {
    Map(BTreeMap<String, Value>),
    List(Vec<String>),
}

impl RawEnvironment {
    fn into_map(self) -> BTreeMap<String, String> {
        match self {
            RawEnvironment::Map(map) => map
                .into_iter()
                .filter_map(|(k, v)| match v {
                    Value::Null => None,
                    Value::String(s) => Some((k, s)),
                    other => Some((k, other.to_string())),
                })
                .collect(),
            RawEnvironment::List(entries) => entries
                .into_iter()
                .filter_map(|entry| {
                    let (k, v) = entry.split_once('=')?;
                    Some((k.to_string(), v.to_string()))
                })
                .collect(),
        }
    }
}

impl ComposeConfig {
    /// Parses `compose config --format json` output.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: RawCompose = serde_json::from_str(json)?;
        let mut services = Vec::with_capacity(raw.services.len());
        for (name, value) in raw.services {
            let svc: RawService = serde_json::from_value(value)?;
            services.push(ComposeService {
                name,
                image: svc.image,
                container_name: svc.container_name,
                environment: svc.environment.map(RawEnvironment::into_map).unwrap_or_default(),
                volumes: svc.volumes,
            });
        }
        let volumes = raw
            .volumes
            .map(|v| v.into_iter().map(|(k, _)| k).collect())
            .unwrap_or_default();
        Ok(Self { services, volumes })
    }

    /// Finds a service by service name or explicit container name.
    pub fn service(&self, name: &str) -> Option<&ComposeService> {
        self.services
            .iter()
            .find(|s| s.name == name || s.container_name.as_deref() == Some(name))
    }

    /// First service (declaration order) whose image matches a database engine.
    pub fn find_db_service(&self) -> Option<(&ComposeService, DbEngine)> {
        self.services.iter().find_map(|s| {
            let engine = DbEngine::from_image(s.image.as_deref()?)?;
            Some((s, engine))
        })
    }

    /// First service (declaration order) whose image matches a cache engine.
    pub fn find_cache_service(&self) -> Option<(&ComposeService, CacheEngine)> {
        self.services.iter().find_map(|s| {
            let engine = CacheEngine::from_image(s.image.as_deref()?)?;
            Some((s, engine))
        })
    }
}

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DbEngine {
    Mysql,
    Mariadb,
}

impl DbEngine {
    /// Detects the engine from an image reference, e.g. `mariadb:11`.
    pub fn from_image(image: &str) -> Option<Self> {
        let m = DB_IMAGE_RE.find(image)?;
        Self::from_name(m.as_str())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mysql" => Some(Self::Mysql),
            "mariadb" => Some(Self::Mariadb),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Mariadb => "mariadb",
        }
    }

    pub fn dump_cmd(self) -> &'static str {
        match self {
            Self::Mysql => "mysqldump",
            Self::Mariadb => "mariadb-dump",
        }
    }

    pub fn admin_cmd(self) -> &'static str {
        match self {
            Self::Mysql => "mysqladmin",
            Self::Mariadb => "mariadb-admin",
        }
    }

    pub fn cli_cmd(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Mariadb => "mariadb",
        }
    }

    /// Environment variable prefixes, most specific first.
    fn env_prefixes(self) -> &'static [&'static str] {
        match self {
            Self::Mysql => &["MYSQL"],
            Self::Mariadb => &["MARIADB", "MYSQL"],
        }
    }
}

/// Credentials declared in a database service's environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbCredentials {
    pub db: Option<String>,
    pub user: Option<String>,
    pub pass: Option<String>,
}

impl DbCredentials {
    /// Reads `<PREFIX>_DATABASE`, `_USER`, `_PASSWORD`; without a user, falls back to root.
    pub fn from_environment(engine: DbEngine, env: &BTreeMap<String, String>) -> Self {
        let lookup = |suffix: &str| {
            engine
                .env_prefixes()
                .iter()
                .find_map(|prefix| env.get(&format!("{}_{}", prefix, suffix)).cloned())
        };
        let db = lookup("DATABASE");
        let (user, pass) = match lookup("USER") {
            Some(user) => (Some(user), lookup("PASSWORD")),
            None => match lookup("ROOT_PASSWORD") {
                Some(root) => (Some("root".to_string()), Some(root)),
                None => (None, None),
            },
        };
        Self { db, user, pass }
    }
}

/// A fully resolved database container. Only produced when every credential is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbContainerInfo {
    /// Container (or compose service) name, used as the host.
    pub container: String,
    pub engine: DbEngine,
    pub db: String,
    pub user: String,
    pub pass: String,
    pub dump_cmd: String,
    pub admin_cmd: String,
    pub cli_cmd: String,
}

impl DbContainerInfo {
    /// Value for a `{db:<key>}` placeholder.
    pub fn placeholder_value(&self, key: &str) -> Option<String> {
        let value = match key {
            "dumpCmd" => &self.dump_cmd,
            "adminCmd" => &self.admin_cmd,
            "cliCmd" => &self.cli_cmd,
            "type" => return Some(self.engine.as_str().to_string()),
            "name" | "db" => &self.db,
            "user" => &self.user,
            "pass" => &self.pass,
            "host" => &self.container,
            _ => return None,
        };
        Some(value.clone())
    }
}

/// Supported cache engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheEngine {
    Redis,
    Valkey,
}

impl CacheEngine {
    pub fn from_image(image: &str) -> Option<Self> {
        let m = CACHE_IMAGE_RE.find(image)?;
        Self::from_name(m.as_str())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "redis" => Some(Self::Redis),
            "valkey" => Some(Self::Valkey),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Redis => "redis",
            Self::Valkey => "valkey",
        }
    }

    pub fn cli_cmd(self) -> &'static str {
        match self {
            Self::Redis => "redis-cli",
            Self::Valkey => "valkey-cli",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheContainerInfo {
    pub container: String,
    pub engine: CacheEngine,
    pub cli_cmd: String,
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const COMPOSE_JSON: &str = r#"{
        "name": "shop",
        "services": {
            "web": { "image": "nginx:1.27", "environment": { "APP_ENV": "dev" } },
            "database": {
                "image": "docker.io/library/MariaDB:11",
                "environment": { "MARIADB_DATABASE": "shop", "MYSQL_USER": "shop", "MYSQL_PASSWORD": "secret", "EMPTY": null },
                "volumes": [ { "type": "volume", "source": "dbdata", "target": "/var/lib/mysql" } ]
            },
            "legacy-db": { "image": "mysql:5.7", "environment": ["MYSQL_DATABASE=old"] },
            "cache": { "image": "valkey/valkey:8", "container_name": "shop-cache" }
        },
        "volumes": { "dbdata": { "name": "shop_dbdata" } }
    }"#;

    #[test]
    fn test_parse_keeps_declaration_order() {
        let cfg = ComposeConfig::from_json(COMPOSE_JSON).unwrap();
        let names: Vec<_> = cfg.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["web", "database", "legacy-db", "cache"]);
        assert_eq!(cfg.volumes, vec!["dbdata"]);
        let db = cfg.service("database").unwrap();
        assert_eq!(db.volumes.len(), 1);
        assert!(!db.environment.contains_key("EMPTY"));
        assert_eq!(
            cfg.service("legacy-db").unwrap().environment.get("MYSQL_DATABASE"),
            Some(&"old".to_string())
        );
        assert_eq!(cfg.service("shop-cache").map(|s| s.name.as_str()), Some("cache"));
    }

    #[test]
    fn test_first_matching_db_service_wins() {
        let cfg = ComposeConfig::from_json(COMPOSE_JSON).unwrap();
        let (svc, engine) = cfg.find_db_service().unwrap();
        assert_eq!(svc.name, "database");
        assert_eq!(engine, DbEngine::Mariadb);
    }

    #[test]
    fn test_cache_detection() {
        let cfg = ComposeConfig::from_json(COMPOSE_JSON).unwrap();
        let (svc, engine) = cfg.find_cache_service().unwrap();
        assert_eq!(svc.name, "cache");
        assert_eq!(engine, CacheEngine::Valkey);
        assert_eq!(engine.cli_cmd(), "valkey-cli");
    }

    #[test]
    fn test_engine_from_image() {
        assert_eq!(DbEngine::from_image("MySQL:8"), Some(DbEngine::Mysql));
        assert_eq!(DbEngine::from_image("bitnami/mariadb"), Some(DbEngine::Mariadb));
        assert_eq!(DbEngine::from_image("postgres:16"), None);
        assert_eq!(CacheEngine::from_image("redis:7-alpine"), Some(CacheEngine::Redis));
    }

    #[test]
    fn test_credentials_fall_back_across_prefixes() {
        let cfg = ComposeConfig::from_json(COMPOSE_JSON).unwrap();
        let env = &cfg.service("database").unwrap().environment;
        let creds = DbCredentials::from_environment(DbEngine::Mariadb, env);
        assert_eq!(creds.db.as_deref(), Some("shop"));
        assert_eq!(creds.user.as_deref(), Some("shop"));
        assert_eq!(creds.pass.as_deref(), Some("secret"));
    }

    #[test]
    fn test_credentials_root_fallback() {
        let env = BTreeMap::from([
            ("MYSQL_DATABASE".to_string(), "app".to_string()),
            ("MYSQL_ROOT_PASSWORD".to_string(), "toor".to_string()),
        ]);
        let creds = DbCredentials::from_environment(DbEngine::Mysql, &env);
        assert_eq!(creds.user.as_deref(), Some("root"));
        assert_eq!(creds.pass.as_deref(), Some("toor"));
    }

    #[test]
    fn test_placeholder_values() {
        let info = DbContainerInfo {
            container: "database".into(),
            engine: DbEngine::Mysql,
            db: "shop".into(),
            user: "u".into(),
            pass: "p".into(),
            dump_cmd: "mysqldump".into(),
            admin_cmd: "mysqladmin".into(),
            cli_cmd: "mysql".into(),
        };
        assert_eq!(info.placeholder_value("host").as_deref(), Some("database"));
        assert_eq!(info.placeholder_value("name").as_deref(), Some("shop"));
        assert_eq!(info.placeholder_value("db").as_deref(), Some("shop"));
        assert_eq!(info.placeholder_value("type").as_deref(), Some("mysql"));
        assert_eq!(info.placeholder_value("dumpCmd").as_deref(), Some("mysqldump"));
        assert_eq!(info.placeholder_value("port"), None);
    }
}
