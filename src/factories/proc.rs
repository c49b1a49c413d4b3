// src/factories/proc.rs

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::config::RedisConfig;
use crate::errors::Result;
use crate::executor::{RedisExecutor, RedisSettings, SavePolicy};
use crate::types::RedisLogLevel;

use super::port::PortSpec;

/// Startup/shutdown budget for fixture-built managed servers.
pub const DEFAULT_PROC_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-fixture overrides for a managed server.
///
/// Every `Some` beats the matching [`RedisConfig`] field.
#[derive(Debug, Clone, Default)]
pub struct ProcOptions {
    pub executable: Option<PathBuf>,
    /// Client idle timeout (`--timeout`), seconds.
    pub timeout: Option<u64>,
    pub host: Option<String>,
    pub port: Option<PortSpec>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub db_count: Option<u32>,
    pub save: Option<String>,
    pub compression: Option<bool>,
    pub checksum: Option<bool>,
    pub syslog: Option<bool>,
    pub loglevel: Option<RedisLogLevel>,
    pub datadir: Option<PathBuf>,
    pub modules: Option<Vec<PathBuf>>,
    pub startup_timeout: Option<Duration>,
}

/// Build (but do not start) a managed executor for fixture `name`.
///
/// Fails with `MalformedSavePolicy` for a bad save string and `NoFreePort`
/// when the port request cannot be satisfied.
pub fn redis_proc(config: &RedisConfig, opts: &ProcOptions, name: &str) -> Result<RedisExecutor> {
    let port = match &opts.port {
        Some(spec) => spec.resolve()?,
        None => PortSpec::from(config.port).resolve()?,
    };

    let save: SavePolicy = opts.save.as_deref().unwrap_or(&config.save).parse()?;

    let datadir = opts
        .datadir
        .clone()
        .or_else(|| config.datadir.clone())
        .unwrap_or_else(|| default_datadir(name));

    let mut settings = RedisSettings::new(
        opts.executable.clone().unwrap_or_else(|| config.exec.clone()),
        opts.host.clone().unwrap_or_else(|| config.host.clone()),
        port,
        datadir,
    );
    settings.username = opts.username.clone().or_else(|| config.username.clone());
    settings.password = opts.password.clone().or_else(|| config.password.clone());
    settings.databases = opts.db_count.unwrap_or(config.db_count);
    settings.redis_timeout = opts.timeout.unwrap_or(config.timeout);
    settings.loglevel = opts.loglevel.unwrap_or(config.loglevel);
    settings.save = save;
    settings.rdbcompression = opts.compression.unwrap_or(config.compression);
    settings.rdbchecksum = opts.checksum.unwrap_or(config.rdbchecksum);
    settings.syslog_enabled = opts.syslog.unwrap_or(config.syslog);
    settings.modules = opts.modules.clone().unwrap_or_else(|| config.modules.clone());
    settings.startup_timeout = opts.startup_timeout.unwrap_or(DEFAULT_PROC_TIMEOUT);

    debug!(
        fixture = name,
        port,
        datadir = %settings.datadir.display(),
        "built redis_proc executor"
    );

    Ok(RedisExecutor::new(settings))
}

fn default_datadir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("redis-fixture-{name}-{}", std::process::id()))
}
