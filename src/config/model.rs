// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::executor::SavePolicy;
use crate::types::RedisLogLevel;

/// Configuration file as read from TOML, before validation.
///
/// ```toml
/// [redis]
/// exec = "/usr/local/bin/redis-server"
/// host = "127.0.0.1"
/// port = 6380
/// save = "900 1 300 10"
/// ```
///
/// The section is optional; every key has a default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub redis: RedisConfig,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub redis: RedisConfig,
    save: SavePolicy,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(redis: RedisConfig, save: SavePolicy) -> Self {
        Self { redis, save }
    }

    /// `redis.save` parsed into pairs.
    pub fn save_policy(&self) -> &SavePolicy {
        &self.save
    }
}

/// The flat per-run record every fixture starts from.
///
/// Field names follow the `redis_*` option names of the test plugin this
/// models (`exec`, `db_count`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_host")]
    pub host: String,

    /// Concrete port; `None` lets fixtures pick a free one.
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Path to `redis-server`.
    #[serde(default = "default_exec")]
    pub exec: PathBuf,

    /// Client idle timeout in seconds (`--timeout`).
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub loglevel: RedisLogLevel,

    #[serde(default = "default_db_count")]
    pub db_count: u32,

    /// Space separated `seconds changes` pairs; empty keeps the server default.
    #[serde(default)]
    pub save: String,

    /// Compress dump files.
    #[serde(default)]
    pub compression: bool,

    #[serde(default)]
    pub rdbchecksum: bool,

    #[serde(default)]
    pub syslog: bool,

    /// Hint for clients: decode responses into strings.
    #[serde(default)]
    pub decode: bool,

    /// Where sockets, logs and dumps go. A fresh temp dir when unset.
    #[serde(default)]
    pub datadir: Option<PathBuf>,

    /// Modules passed as `--loadmodule`.
    #[serde(default)]
    pub modules: Vec<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_exec() -> PathBuf {
    PathBuf::from("/usr/bin/redis-server")
}

fn default_timeout() -> u64 {
    30
}

fn default_db_count() -> u32 {
    8
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            username: None,
            password: None,
            exec: default_exec(),
            timeout: default_timeout(),
            loglevel: RedisLogLevel::default(),
            db_count: default_db_count(),
            save: String::new(),
            compression: false,
            rdbchecksum: false,
            syslog: false,
            decode: false,
            datadir: None,
            modules: Vec::new(),
        }
    }
}
