// src/executor/process.rs

//! Managed `redis-server` executor.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::errors::{FixtureError, Result};
use crate::exec::poll::{ATTEMPT_TIMEOUT, POLL_INTERVAL};
use crate::exec::{Deadline, ManagedProcess, probe_version, tcp_available};
use crate::types::ExecutorState;
use crate::version::{Version, extract_version};

use super::command::{Artifacts, RedisSettings, build_command, check_unixsocket_length};
use super::{BoxFuture, Endpoint, Executor};

/// Oldest `redis-server` this crate knows how to drive.
pub const MIN_SUPPORTED_VERSION: Version = Version::from_static(&[2, 6]);

/// Owns one `redis-server` process from spawn to reap.
///
/// Start sequence:
/// 1. socket path length check (nothing is spawned if it fails),
/// 2. `--version` probe (bounded by `startup_timeout`) and
///    [`MIN_SUPPORTED_VERSION`] gate,
/// 3. spawn with the command from [`build_command`],
/// 4. poll the TCP port until it accepts or `startup_timeout` runs out.
///
/// The same `startup_timeout` bounds the graceful part of `stop()`.
#[derive(Debug)]
pub struct RedisExecutor {
    settings: RedisSettings,
    artifacts: Artifacts,
    endpoint: Endpoint,
    state: ExecutorState,
    process: Option<ManagedProcess>,
    version: Option<Version>,
    command: Vec<OsString>,
}

impl RedisExecutor {
    pub fn new(settings: RedisSettings) -> Self {
        let artifacts = settings.artifacts();
        let endpoint = Endpoint {
            host: settings.host.clone(),
            port: settings.port,
            username: settings.username.clone(),
            password: settings.password.clone(),
            unixsocket: Some(artifacts.unixsocket.clone()),
        };

        Self {
            settings,
            artifacts,
            endpoint,
            state: ExecutorState::Idle,
            process: None,
            version: None,
            command: Vec::new(),
        }
    }

    pub fn settings(&self) -> &RedisSettings {
        &self.settings
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(ManagedProcess::pid)
    }

    /// The argv used for the last spawn; empty until `start()` got that far.
    pub fn command_parts(&self) -> &[OsString] {
        &self.command
    }

    /// Version detected during `start()`.
    pub fn detected_version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Ask the configured executable for its version.
    ///
    /// # Panics
    ///
    /// Panics if the executable prints something without a version number in
    /// it; see [`extract_version`].
    pub async fn version(&self) -> Result<Version> {
        detect_version(&self.settings.executable, self.settings.startup_timeout).await
    }

    pub async fn start(&mut self) -> Result<()> {
        if self.state != ExecutorState::Idle {
            return Err(FixtureError::Other(anyhow!(
                "executor for port {} was already started (state {:?})",
                self.settings.port,
                self.state
            )));
        }

        self.state = ExecutorState::Starting;
        match self.start_inner().await {
            Ok(()) => {
                self.state = ExecutorState::Running;
                info!(
                    port = self.settings.port,
                    pid = self.pid(),
                    version = ?self.version.as_ref().map(ToString::to_string),
                    "redis-server is ready"
                );
                Ok(())
            }
            Err(e) => {
                self.state = ExecutorState::Failed;
                warn!(port = self.settings.port, error = %e, "redis-server failed to start");
                Err(e)
            }
        }
    }

    async fn start_inner(&mut self) -> Result<()> {
        check_unixsocket_length(&self.artifacts.unixsocket)?;

        let executable = self.settings.executable.clone();
        let version = detect_version(&executable, self.settings.startup_timeout).await?;
        if version < MIN_SUPPORTED_VERSION {
            return Err(FixtureError::Unsupported {
                found: version,
                minimum: MIN_SUPPORTED_VERSION,
            });
        }

        tokio::fs::create_dir_all(&self.artifacts.datadir).await?;

        let argv = build_command(&self.settings, &version);
        self.version = Some(version);
        self.command = argv;
        self.process = Some(ManagedProcess::spawn(&self.command)?);

        self.wait_until_ready().await
    }

    async fn wait_until_ready(&mut self) -> Result<()> {
        let deadline = Deadline::after(self.settings.startup_timeout);

        loop {
            if let Some(process) = self.process.as_mut() {
                if let Some(status) = process.exit_status()? {
                    return Err(FixtureError::ProcessExited {
                        command: process.command_line().to_string(),
                        status: status.to_string(),
                        logfile: self.artifacts.logfile.clone(),
                    });
                }
            }

            if tcp_available(&self.settings.host, self.settings.port, ATTEMPT_TIMEOUT).await {
                return Ok(());
            }

            if deadline.expired() {
                return Err(FixtureError::StartupTimeout {
                    host: self.settings.host.clone(),
                    port: self.settings.port,
                    timeout: deadline.budget(),
                });
            }

            deadline.tick(POLL_INTERVAL).await;
        }
    }

    /// Terminate and reap the child, then drop stale pid/socket files.
    ///
    /// The data directory itself, the log and the dump are left in place.
    pub async fn stop(&mut self) -> Result<()> {
        if matches!(self.state, ExecutorState::Idle) || self.state.is_terminal() {
            return Ok(());
        }

        self.state = ExecutorState::Stopping;
        let terminated = match self.process.take() {
            Some(process) => process
                .terminate(self.settings.startup_timeout)
                .await
                .map(|status| debug!(port = self.settings.port, %status, "redis-server reaped")),
            None => Ok(()),
        };

        remove_stale(&self.artifacts.pidfile);
        remove_stale(&self.artifacts.unixsocket);
        self.state = ExecutorState::Stopped;

        terminated
    }

    /// Whether the owned child is still alive.
    pub fn running(&mut self) -> bool {
        self.process
            .as_mut()
            .is_some_and(|process| !process.has_exited())
    }
}

async fn detect_version(executable: &Path, limit: Duration) -> Result<Version> {
    let banner = probe_version(executable, limit).await?;
    Ok(extract_version(&banner))
}

fn remove_stale(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed leftover file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove leftover file"),
    }
}

impl Executor for RedisExecutor {
    fn start(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(RedisExecutor::start(self))
    }

    fn stop(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(RedisExecutor::stop(self))
    }

    fn running(&mut self) -> BoxFuture<'_, bool> {
        let alive = RedisExecutor::running(self);
        Box::pin(async move { alive })
    }

    fn state(&self) -> ExecutorState {
        self.state
    }

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl Drop for RedisExecutor {
    fn drop(&mut self) {
        if let Some(process) = self.process.as_mut() {
            if !process.has_exited() {
                warn!(
                    pid = process.pid(),
                    port = self.settings.port,
                    "executor dropped without stop(); killing redis-server"
                );
            }
        }
    }
}
