// tests/startup_failures.rs
#![cfg(unix)]

mod common;
use crate::common::builders::settings_for;
use crate::common::{FakeBehaviour, FakeRedis, init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use redis_fixture::errors::{FixtureError, Result};
use redis_fixture::executor::{BoxFuture, Endpoint, Executor, MAX_UNIXSOCKET, RedisExecutor, with_executor};
use redis_fixture::types::ExecutorState;
use tempfile::TempDir;

type TestResult = std::result::Result<(), Box<dyn Error>>;

#[tokio::test]
async fn long_socket_path_fails_before_anything_runs() -> TestResult {
    init_tracing();

    let bin = TempDir::new()?;
    let data = TempDir::new()?;
    let exe = FakeRedis::with_version("7.0.0").install(bin.path())?;
    let deep = data.path().join("d".repeat(MAX_UNIXSOCKET));

    let mut executor = RedisExecutor::new(settings_for(&exe, &deep));
    match executor.start().await {
        Err(FixtureError::UnixSocketTooLong { path, limit }) => {
            assert_eq!(limit, MAX_UNIXSOCKET);
            assert!(path.starts_with(&deep));
        }
        other => panic!("expected UnixSocketTooLong, got {other:?}"),
    }

    assert!(executor.pid().is_none());
    assert!(executor.detected_version().is_none());
    assert!(!deep.exists(), "datadir should not be created");
    Ok(())
}

#[tokio::test]
async fn child_that_exits_reports_its_command() -> TestResult {
    init_tracing();

    let bin = TempDir::new()?;
    let data = TempDir::new()?;
    let exe = FakeRedis::with_version("7.2.0")
        .behaviour(FakeBehaviour::Exit(3))
        .install(bin.path())?;

    let mut executor = RedisExecutor::new(settings_for(&exe, data.path()));
    let started = Instant::now();
    match executor.start().await {
        Err(FixtureError::ProcessExited {
            command,
            status,
            logfile,
        }) => {
            assert!(command.starts_with(&exe.display().to_string()));
            assert!(command.contains("--daemonize no"));
            assert!(status.contains('3'), "status was {status}");
            assert_eq!(&logfile, &executor.artifacts().logfile);
        }
        other => panic!("expected ProcessExited, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(executor.state(), ExecutorState::Failed);
    assert!(data.path().is_dir());

    executor.stop().await?;
    assert_eq!(executor.state(), ExecutorState::Stopped);
    Ok(())
}

#[tokio::test]
async fn silent_child_times_out_and_is_reaped() -> TestResult {
    init_tracing();

    let bin = TempDir::new()?;
    let data = TempDir::new()?;
    let exe = FakeRedis::with_version("6.2.6")
        .behaviour(FakeBehaviour::Hang)
        .install(bin.path())?;

    let mut settings = settings_for(&exe, data.path());
    settings.startup_timeout = Duration::from_secs(1);
    let mut executor = RedisExecutor::new(settings);

    let started = Instant::now();
    match executor.start().await {
        Err(FixtureError::StartupTimeout { port, timeout, .. }) => {
            assert_eq!(port, executor.settings().port);
            assert_eq!(timeout, Duration::from_secs(1));
        }
        other => panic!("expected StartupTimeout, got {other:?}"),
    }
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(1), "gave up after {waited:?}");
    assert!(waited < Duration::from_secs(5), "took {waited:?}");

    assert!(executor.pid().is_some(), "child should still be owned");
    assert!(executor.running());

    with_timeout(executor.stop()).await?;
    assert!(!executor.running());
    assert_eq!(executor.state(), ExecutorState::Stopped);
    Ok(())
}

#[tokio::test]
async fn child_ignoring_sigterm_is_killed() -> TestResult {
    init_tracing();

    let bin = TempDir::new()?;
    let data = TempDir::new()?;
    let exe = FakeRedis::with_version("7.2.0")
        .behaviour(FakeBehaviour::IgnoreTerm)
        .install(bin.path())?;

    let mut settings = settings_for(&exe, data.path());
    settings.startup_timeout = Duration::from_secs(1);
    let mut executor = RedisExecutor::new(settings);

    assert!(matches!(
        executor.start().await,
        Err(FixtureError::StartupTimeout { .. })
    ));

    let stopping = Instant::now();
    with_timeout(executor.stop()).await?;
    assert!(
        stopping.elapsed() >= Duration::from_secs(1),
        "SIGKILL should only follow the grace period"
    );
    assert!(!executor.running());
    Ok(())
}

#[tokio::test]
async fn second_start_is_rejected() -> TestResult {
    init_tracing();

    let bin = TempDir::new()?;
    let data = TempDir::new()?;
    let exe = FakeRedis::with_version("7.2.0").install(bin.path())?;

    let mut executor = RedisExecutor::new(settings_for(&exe, data.path()));
    assert!(executor.start().await.is_err());
    assert!(matches!(executor.start().await, Err(FixtureError::Other(_))));
    executor.stop().await?;
    Ok(())
}

#[tokio::test]
async fn scoped_run_stops_after_failed_start() -> TestResult {
    init_tracing();

    let bin = TempDir::new()?;
    let data = TempDir::new()?;
    let exe = FakeRedis::with_version("7.2.0").install(bin.path())?;
    let executor = RedisExecutor::new(settings_for(&exe, data.path()));
    let pidfile = executor.artifacts().pidfile.clone();
    std::fs::write(&pidfile, "12345")?;

    let mut body_ran = false;
    let outcome = with_executor(executor, |_endpoint| {
        body_ran = true;
        async {}
    })
    .await;

    assert!(matches!(outcome, Err(FixtureError::ProcessExited { .. })));
    assert!(!body_ran);
    assert!(!pidfile.exists(), "stop() should clear a stale pidfile");
    Ok(())
}

/// Records lifecycle calls; start or stop can be told to fail.
struct Recording {
    endpoint: Endpoint,
    state: ExecutorState,
    fail_start: bool,
    fail_stop: bool,
    stops: Arc<AtomicUsize>,
}

impl Recording {
    fn new(fail_start: bool, fail_stop: bool) -> (Self, Arc<AtomicUsize>) {
        let stops = Arc::new(AtomicUsize::new(0));
        let executor = Self {
            endpoint: Endpoint {
                host: "127.0.0.1".to_string(),
                port: 1,
                username: None,
                password: None,
                unixsocket: None,
            },
            state: ExecutorState::Idle,
            fail_start,
            fail_stop,
            stops: Arc::clone(&stops),
        };
        (executor, stops)
    }
}

impl Executor for Recording {
    fn start(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if self.fail_start {
                self.state = ExecutorState::Failed;
                return Err(FixtureError::NoFreePort("start".into()));
            }
            self.state = ExecutorState::Running;
            Ok(())
        })
    }

    fn stop(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.stops.fetch_add(1, Ordering::SeqCst);
            self.state = ExecutorState::Stopped;
            if self.fail_stop {
                return Err(FixtureError::NoFreePort("stop".into()));
            }
            Ok(())
        })
    }

    fn running(&mut self) -> BoxFuture<'_, bool> {
        let alive = self.state == ExecutorState::Running;
        Box::pin(async move { alive })
    }

    fn state(&self) -> ExecutorState {
        self.state
    }

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[tokio::test]
async fn scoped_run_stops_exactly_once() -> TestResult {
    let (executor, stops) = Recording::new(false, false);
    let port = with_executor(executor, |endpoint| async move { endpoint.port }).await?;
    assert_eq!(port, 1);
    assert_eq!(stops.load(Ordering::SeqCst), 1);

    let (executor, stops) = Recording::new(true, false);
    assert!(with_executor(executor, |_| async {}).await.is_err());
    assert_eq!(stops.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn start_error_wins_over_stop_error() -> TestResult {
    let (executor, _) = Recording::new(true, true);
    match with_executor(executor, |_| async {}).await {
        Err(FixtureError::NoFreePort(which)) => assert_eq!(which, "start"),
        other => panic!("expected the start error, got {other:?}"),
    }

    let (executor, stops) = Recording::new(false, true);
    match with_executor(executor, |_| async {}).await {
        Err(FixtureError::NoFreePort(which)) => assert_eq!(which, "stop"),
        other => panic!("expected the stop error, got {other:?}"),
    }
    assert_eq!(stops.load(Ordering::SeqCst), 1);
    Ok(())
}
