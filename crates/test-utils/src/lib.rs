pub mod builders;
#[cfg(unix)]
pub mod fake_redis;

use std::path::PathBuf;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=redis_fixture=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a future with a 30-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(30), f)
        .await
        .expect("Test timed out after 30 seconds")
}

/// A real `redis-server` to test against, if this machine has one.
///
/// `REDIS_EXEC` wins, then `/usr/bin/redis-server`, then `PATH`.
pub fn real_redis_server() -> Option<PathBuf> {
    find_binary("REDIS_EXEC", "redis-server")
}

/// `redis-cli`, used to talk to real servers without a client library.
pub fn real_redis_cli() -> Option<PathBuf> {
    find_binary("REDIS_CLI", "redis-cli")
}

fn find_binary(env_var: &str, name: &str) -> Option<PathBuf> {
    if let Ok(path) = std::env::var(env_var) {
        let path = PathBuf::from(path);
        return path.is_file().then_some(path);
    }

    let system = PathBuf::from("/usr/bin").join(name);
    if system.is_file() {
        return Some(system);
    }

    std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}
