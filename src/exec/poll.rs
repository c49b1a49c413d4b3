// src/exec/poll.rs

//! Bounded polling helpers.

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::{Instant, sleep, timeout};
use tracing::trace;

/// Per-attempt budget for a single TCP connect.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_millis(100);

/// Pause between two readiness probes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Overall budget for a polling loop.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Sleep for `interval`, never past the deadline.
    pub async fn tick(&self, interval: Duration) {
        sleep(interval.min(self.remaining())).await;
    }
}

/// Call `probe` until it returns `true` or `budget` runs out.
///
/// Returns whether the probe ever succeeded.
pub async fn wait_for<F, Fut>(budget: Duration, interval: Duration, mut probe: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Deadline::after(budget);
    loop {
        if probe().await {
            return true;
        }
        if deadline.expired() {
            return false;
        }
        deadline.tick(interval).await;
    }
}

/// One connection attempt against `host:port`.
///
/// Refused connections, resolution failures and slow connects all count as
/// "not available"; nothing here is raised.
pub async fn tcp_available(host: &str, port: u16, attempt_timeout: Duration) -> bool {
    match timeout(attempt_timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            trace!(host, port, error = %e, "connection attempt failed");
            false
        }
        Err(_) => {
            trace!(host, port, ?attempt_timeout, "connection attempt timed out");
            false
        }
    }
}
