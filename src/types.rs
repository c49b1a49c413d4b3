use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// `redis-server --loglevel` verbosity.
///
/// `nothing` only exists on Redis 7+, older servers refuse to start with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedisLogLevel {
    Debug,
    Verbose,
    Notice,
    Warning,
    Nothing,
}

impl Default for RedisLogLevel {
    fn default() -> Self {
        RedisLogLevel::Notice
    }
}

impl RedisLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedisLogLevel::Debug => "debug",
            RedisLogLevel::Verbose => "verbose",
            RedisLogLevel::Notice => "notice",
            RedisLogLevel::Warning => "warning",
            RedisLogLevel::Nothing => "nothing",
        }
    }
}

impl fmt::Display for RedisLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedisLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(RedisLogLevel::Debug),
            "verbose" => Ok(RedisLogLevel::Verbose),
            "notice" => Ok(RedisLogLevel::Notice),
            "warning" => Ok(RedisLogLevel::Warning),
            "nothing" => Ok(RedisLogLevel::Nothing),
            other => Err(format!(
                "invalid loglevel: {other} (expected one of debug, verbose, notice, warning, nothing)"
            )),
        }
    }
}

/// Lifecycle state shared by both executor kinds.
///
/// `Idle -> Starting -> Running -> Stopping -> Stopped`, with `Starting ->
/// Failed` when startup is aborted. `Failed` executors still accept `stop()`
/// so a half-started child gets reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    Idle,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl ExecutorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutorState::Stopped)
    }
}
