// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile, RedisConfig};
use crate::errors::{FixtureError, Result};
use crate::executor::SavePolicy;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::FixtureError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_redis_config(&raw.redis)?;
        let save: SavePolicy = raw.redis.save.parse()?;
        Ok(ConfigFile::new_unchecked(raw.redis, save))
    }
}

pub fn validate_redis_config(cfg: &RedisConfig) -> Result<()> {
    if cfg.host.trim().is_empty() {
        return Err(FixtureError::ConfigError(
            "[redis].host must not be empty".to_string(),
        ));
    }

    if cfg.port == Some(0) {
        return Err(FixtureError::ConfigError(
            "[redis].port must be a concrete port (got 0); leave it unset for a random one"
                .to_string(),
        ));
    }

    if cfg.db_count == 0 {
        return Err(FixtureError::ConfigError(
            "[redis].db_count must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.exec.as_os_str().is_empty() {
        return Err(FixtureError::ConfigError(
            "[redis].exec must point at a redis-server binary".to_string(),
        ));
    }

    Ok(())
}
