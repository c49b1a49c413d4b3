// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile, RedisConfig};
use crate::errors::{FixtureError, Result};

/// Prefix of the environment variables that override file values,
/// e.g. `REDIS_FIXTURE_PORT=6390`.
pub const ENV_PREFIX: &str = "REDIS_FIXTURE_";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate. Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load, apply `REDIS_FIXTURE_*` overrides from the process environment,
/// validate.
///
/// A missing file at the default location is not an error; defaults apply.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let mut raw = if path.exists() || path != default_config_path().as_path() {
        load_from_path(path)?
    } else {
        debug!(path = %path.display(), "no config file, using defaults");
        RawConfigFile::default()
    };

    apply_env_overrides(&mut raw.redis, |name| std::env::var(name).ok())?;
    ConfigFile::try_from(raw)
}

/// Overlay values looked up through `lookup` (normally `std::env::var`).
///
/// Keys are `REDIS_FIXTURE_` + the upper-cased field name. Flags accept
/// `1/0`, `true/false`, `yes/no`.
pub fn apply_env_overrides<F>(cfg: &mut RedisConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |field: &str| lookup(&format!("{ENV_PREFIX}{}", field.to_uppercase()));

    if let Some(v) = get("host") {
        cfg.host = v;
    }
    if let Some(v) = get("port") {
        cfg.port = Some(parse_field("port", &v)?);
    }
    if let Some(v) = get("username") {
        cfg.username = Some(v);
    }
    if let Some(v) = get("password") {
        cfg.password = Some(v);
    }
    if let Some(v) = get("exec") {
        cfg.exec = PathBuf::from(v);
    }
    if let Some(v) = get("timeout") {
        cfg.timeout = parse_field("timeout", &v)?;
    }
    if let Some(v) = get("loglevel") {
        cfg.loglevel = v.parse().map_err(FixtureError::ConfigError)?;
    }
    if let Some(v) = get("db_count") {
        cfg.db_count = parse_field("db_count", &v)?;
    }
    if let Some(v) = get("save") {
        cfg.save = v;
    }
    if let Some(v) = get("compression") {
        cfg.compression = parse_flag("compression", &v)?;
    }
    if let Some(v) = get("rdbchecksum") {
        cfg.rdbchecksum = parse_flag("rdbchecksum", &v)?;
    }
    if let Some(v) = get("syslog") {
        cfg.syslog = parse_flag("syslog", &v)?;
    }
    if let Some(v) = get("decode") {
        cfg.decode = parse_flag("decode", &v)?;
    }
    if let Some(v) = get("datadir") {
        cfg.datadir = Some(PathBuf::from(v));
    }

    Ok(())
}

fn parse_field<T>(field: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        FixtureError::ConfigError(format!("{ENV_PREFIX}{}={value:?}: {e}", field.to_uppercase()))
    })
}

fn parse_flag(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(FixtureError::ConfigError(format!(
            "{ENV_PREFIX}{}={other:?}: expected a boolean",
            field.to_uppercase()
        ))),
    }
}

/// `redis-fixture.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("redis-fixture.toml")
}
