// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `redis-fixture`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "redis-fixture",
    version,
    about = "Run throwaway redis-server instances for tests, or check external ones.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML, `[redis]` table).
    ///
    /// Missing default file means built-in defaults.
    #[arg(long, value_name = "PATH", default_value = "redis-fixture.toml")]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REDIS_FIXTURE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Start a managed redis-server and keep it up until Ctrl-C.
    Serve {
        /// Port request: `6390`, `random`, `7000-7100` or `7001,7002`.
        #[arg(long, value_name = "SPEC")]
        port: Option<String>,

        /// Directory for the socket, pid, log and dump files.
        #[arg(long, value_name = "PATH")]
        datadir: Option<PathBuf>,
    },

    /// Wait for an already running server to accept connections.
    Probe {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Seconds to keep trying.
        #[arg(long, value_name = "SECS", default_value_t = 15)]
        timeout: u64,
    },

    /// Print the version of the configured redis-server.
    Version,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
