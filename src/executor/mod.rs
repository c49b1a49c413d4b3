// src/executor/mod.rs

//! Server lifecycle executors.
//!
//! Two implementations of one [`Executor`] contract:
//!
//! - [`RedisExecutor`] owns a `redis-server` child: it builds the command,
//!   gates on the installed version, spawns, waits for the port and tears the
//!   process down again.
//! - [`NoopRedis`] points at a server somebody else runs and only checks that
//!   it answers.
//!
//! Tests normally go through [`with_executor`], which guarantees `stop()` on
//! every exit path.

pub mod command;
pub mod noop;
pub mod process;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::errors::Result;
use crate::types::ExecutorState;

pub use command::{
    Artifacts, MAX_UNIXSOCKET, RedisBool, RedisSettings, SavePolicy, build_command,
    check_unixsocket_length, redis_bool,
};
pub use noop::NoopRedis;
pub use process::{MIN_SUPPORTED_VERSION, RedisExecutor};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where and how a client reaches the server behind an executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Only managed servers listen on a unix socket.
    pub unixsocket: Option<PathBuf>,
}

/// Lifecycle shared by managed and passive executors.
///
/// `start` is called at most once per executor. `stop` may be called any
/// number of times; only the first call after a start attempt does work.
pub trait Executor: Send {
    fn start(&mut self) -> BoxFuture<'_, Result<()>>;

    fn stop(&mut self) -> BoxFuture<'_, Result<()>>;

    /// Liveness check; never errors on refused or slow connections.
    fn running(&mut self) -> BoxFuture<'_, bool>;

    fn state(&self) -> ExecutorState;

    fn endpoint(&self) -> &Endpoint;
}

/// Start `executor`, run `body` against its endpoint, then stop it.
///
/// `stop()` runs exactly once whether `start()` failed (possibly after the
/// child was spawned), `body` returned, or the stop itself is the only thing
/// that goes wrong. A start error takes precedence over a stop error.
///
/// If `body` panics the executor is dropped during unwinding, which kills a
/// managed child.
pub async fn with_executor<E, F, Fut, T>(mut executor: E, body: F) -> Result<T>
where
    E: Executor,
    F: FnOnce(Endpoint) -> Fut,
    Fut: Future<Output = T>,
{
    let outcome = match executor.start().await {
        Ok(()) => Ok(body(executor.endpoint().clone()).await),
        Err(e) => Err(e),
    };

    let stopped = executor.stop().await;
    let value = outcome?;
    stopped?;
    Ok(value)
}
