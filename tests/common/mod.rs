#![allow(dead_code)]

pub use redis_fixture_test_utils::builders;
#[cfg(unix)]
pub use redis_fixture_test_utils::fake_redis::{FakeBehaviour, FakeRedis};
pub use redis_fixture_test_utils::{init_tracing, real_redis_cli, real_redis_server, with_timeout};

use std::path::Path;
use std::process::Command;

/// Run `redis-cli -p <port> <args...>` and return trimmed stdout.
pub fn redis_cli(cli: &Path, port: u16, args: &[&str]) -> String {
    let output = Command::new(cli)
        .arg("-p")
        .arg(port.to_string())
        .args(args)
        .output()
        .expect("running redis-cli");
    assert!(output.status.success(), "redis-cli {args:?} failed: {output:?}");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
