// src/factories/noproc.rs

use std::time::Duration;

use crate::config::RedisConfig;
use crate::executor::NoopRedis;
use crate::executor::noop::DEFAULT_NOOP_TIMEOUT;

/// Port assumed for an external server when nothing else says otherwise.
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Per-fixture overrides for an externally managed server.
#[derive(Debug, Clone, Default)]
pub struct NoprocOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// How long `start()` keeps trying to connect.
    pub startup_timeout: Option<Duration>,
}

/// Build (but do not start) a passive executor.
pub fn redis_noproc(config: &RedisConfig, opts: &NoprocOptions) -> NoopRedis {
    let host = opts.host.clone().unwrap_or_else(|| config.host.clone());
    let port = opts.port.or(config.port).unwrap_or(DEFAULT_REDIS_PORT);

    NoopRedis::new(host, port)
        .with_credentials(
            opts.username.clone().or_else(|| config.username.clone()),
            opts.password.clone().or_else(|| config.password.clone()),
        )
        .with_startup_timeout(opts.startup_timeout.unwrap_or(DEFAULT_NOOP_TIMEOUT))
}
