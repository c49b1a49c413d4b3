// src/lib.rs

//! Throwaway `redis-server` instances for test suites.
//!
//! The library side is what tests use: build an executor from config with
//! [`factories::redis_proc`] (managed) or [`factories::redis_noproc`]
//! (external), then run the test body inside [`executor::with_executor`].
//! The binary wraps the same pieces for manual use.

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod executor;
pub mod factories;
pub mod logging;
pub mod types;
pub mod version;

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::cli::{CliArgs, CliCommand};
use crate::config::{ConfigFile, load_and_validate};
use crate::executor::with_executor;
use crate::factories::{ClientParams, NoprocOptions, PortSpec, ProcOptions, redis_noproc, redis_proc};
use crate::version::Version;

/// Budget for `redis-fixture version`.
const VERSION_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)
        .with_context(|| format!("loading config from {:?}", args.config))?;

    match args.command {
        CliCommand::Serve { port, datadir } => serve(&cfg, port, datadir).await,
        CliCommand::Probe {
            host,
            port,
            timeout,
        } => probe(&cfg, host, port, timeout).await,
        CliCommand::Version => print_version(&cfg).await,
    }
}

async fn serve(
    cfg: &ConfigFile,
    port: Option<String>,
    datadir: Option<std::path::PathBuf>,
) -> Result<()> {
    let opts = ProcOptions {
        port: port.as_deref().map(str::parse::<PortSpec>).transpose()?,
        datadir,
        ..ProcOptions::default()
    };
    let executor = redis_proc(&cfg.redis, &opts, "serve")?;
    let decode = cfg.redis.decode;

    let waited = with_executor(executor, |endpoint| async move {
        let params = ClientParams::from_endpoint(&endpoint, 0, decode);
        println!("{}", params.url());
        if let Some(unix) = params.unix_url() {
            println!("{unix}");
        }
        info!("serving until Ctrl-C");
        tokio::signal::ctrl_c().await
    })
    .await?;

    waited.context("waiting for Ctrl-C")
}

async fn probe(cfg: &ConfigFile, host: Option<String>, port: Option<u16>, timeout: u64) -> Result<()> {
    let opts = NoprocOptions {
        host,
        port,
        startup_timeout: Some(Duration::from_secs(timeout)),
        ..NoprocOptions::default()
    };
    let mut executor = redis_noproc(&cfg.redis, &opts);
    executor.start().await?;
    println!("{}:{} is accepting connections", executor.endpoint().host, executor.endpoint().port);
    executor.stop();
    Ok(())
}

async fn print_version(cfg: &ConfigFile) -> Result<()> {
    let banner = exec::probe_version(&cfg.redis.exec, VERSION_QUERY_TIMEOUT).await?;
    let version = Version::find(&banner)
        .ok_or_else(|| anyhow!("no version number in {:?}", banner.trim()))?;
    println!("{version}");
    Ok(())
}
