#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use redis_fixture::config::{ConfigFile, RawConfigFile, RedisConfig};
use redis_fixture::executor::RedisSettings;
use redis_fixture::factories::PortSpec;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn exec(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.redis.exec = path.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.redis.port = Some(port);
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.config.redis.password = Some(password.to_string());
        self
    }

    pub fn save(mut self, save: &str) -> Self {
        self.config.redis.save = save.to_string();
        self
    }

    pub fn datadir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.redis.datadir = Some(dir.into());
        self
    }

    pub fn decode(mut self, val: bool) -> Self {
        self.config.redis.decode = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn redis(self) -> RedisConfig {
        self.config.redis
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for a managed server on a fresh random port with a short
/// startup budget, rooted at `datadir`.
pub fn settings_for(executable: &Path, datadir: &Path) -> RedisSettings {
    let port = PortSpec::Random.resolve().expect("no free port");
    let mut settings = RedisSettings::new(executable, "127.0.0.1", port, datadir);
    settings.databases = 4;
    settings.startup_timeout = Duration::from_secs(30);
    settings
}
