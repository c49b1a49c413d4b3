// src/executor/noop.rs

//! Executor for a Redis instance started by a third party.

use std::time::Duration;

use tracing::{debug, info};

use crate::errors::{FixtureError, Result};
use crate::exec::poll::{ATTEMPT_TIMEOUT, POLL_INTERVAL};
use crate::exec::{tcp_available, wait_for};
use crate::types::ExecutorState;

use super::{BoxFuture, Endpoint, Executor};

pub const DEFAULT_NOOP_TIMEOUT: Duration = Duration::from_secs(15);

/// Never spawns or signals anything: `start()` waits for the endpoint to
/// accept a TCP connection and `stop()` only flips the state.
#[derive(Debug, Clone)]
pub struct NoopRedis {
    endpoint: Endpoint,
    startup_timeout: Duration,
    state: ExecutorState,
}

impl NoopRedis {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            endpoint: Endpoint {
                host: host.into(),
                port,
                username: None,
                password: None,
                unixsocket: None,
            },
            startup_timeout: DEFAULT_NOOP_TIMEOUT,
            state: ExecutorState::Idle,
        }
    }

    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.endpoint.username = username;
        self.endpoint.password = password;
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    pub fn startup_timeout(&self) -> Duration {
        self.startup_timeout
    }

    pub async fn start(&mut self) -> Result<()> {
        self.state = ExecutorState::Starting;

        let host = self.endpoint.host.as_str();
        let port = self.endpoint.port;
        debug!(host, port, timeout = ?self.startup_timeout, "waiting for external redis");

        let reachable = wait_for(self.startup_timeout, POLL_INTERVAL, || {
            tcp_available(host, port, ATTEMPT_TIMEOUT)
        })
        .await;

        if !reachable {
            self.state = ExecutorState::Failed;
            return Err(FixtureError::StartupTimeout {
                host: self.endpoint.host.clone(),
                port,
                timeout: self.startup_timeout,
            });
        }

        info!(host = %self.endpoint.host, port, "external redis is reachable");
        self.state = ExecutorState::Running;
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state != ExecutorState::Idle {
            self.state = ExecutorState::Stopped;
        }
    }

    pub async fn running(&self) -> bool {
        tcp_available(&self.endpoint.host, self.endpoint.port, ATTEMPT_TIMEOUT).await
    }
}

impl Executor for NoopRedis {
    fn start(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(NoopRedis::start(self))
    }

    fn stop(&mut self) -> BoxFuture<'_, Result<()>> {
        NoopRedis::stop(self);
        Box::pin(async { Ok(()) })
    }

    fn running(&mut self) -> BoxFuture<'_, bool> {
        Box::pin(NoopRedis::running(self))
    }

    fn state(&self) -> ExecutorState {
        self.state
    }

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}
