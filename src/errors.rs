// src/errors.rs

//! Crate-wide error type.
//!
//! Every lifecycle failure gets its own variant so tests can match on the
//! exact condition instead of string-sniffing a generic error.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::version::Version;

#[derive(Error, Debug)]
pub enum FixtureError {
    /// The executable is missing or says nothing when asked for `--version`.
    #[error("Bad path to redis executable is given: {executable:?} does not exist or is the wrong program")]
    Misconfigured { executable: PathBuf },

    #[error(
        "Your version of Redis is not supported. Consider updating to Redis {minimum} at least. \
         The currently installed version of Redis: {found}."
    )]
    Unsupported { found: Version, minimum: Version },

    #[error(
        "Unix socket path is longer than {limit} allowed on your system: {path:?}. \
         It's probably due to the temporary directory configuration; \
         point the data directory at a shorter path (e.g. /tmp/redis-fixture)"
    )]
    UnixSocketTooLong { path: PathBuf, limit: usize },

    #[error("{host}:{port} did not accept connections within {timeout:?}")]
    StartupTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    #[error("process exited during startup ({status}); command: {command}; see {logfile:?}")]
    ProcessExited {
        command: String,
        status: String,
        logfile: PathBuf,
    },

    #[error("Malformed save policy {value:?}: {reason}")]
    MalformedSavePolicy { value: String, reason: String },

    #[error("No free port available in {0}")]
    NoFreePort(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FixtureError>;
