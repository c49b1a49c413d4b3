// src/executor/command.rs

//! `redis-server` command-line construction.
//!
//! [`build_command`] is a pure function of a [`RedisSettings`] and the version
//! of the installed binary: the `--save` grammar changed in Redis 7, so the
//! same settings render differently depending on what is installed.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{FixtureError, Result};
use crate::types::RedisLogLevel;
use crate::version::Version;

/// Longest unix socket path `bind(2)` accepts (`sun_path` minus the NUL).
#[cfg(target_os = "linux")]
pub const MAX_UNIXSOCKET: usize = 107;
#[cfg(not(target_os = "linux"))]
pub const MAX_UNIXSOCKET: usize = 104;

/// First Redis release that takes the whole save policy as a single argument.
const SINGLE_SAVE_FLAG_MAJOR: u64 = 7;

/// Truthiness as `redis-server` flags want it: `"yes"` or `"no"`.
///
/// A value is `"yes"` when it is truthy and not literally `"no"`.
pub trait RedisBool {
    fn is_truthy(&self) -> bool;

    fn is_literal_no(&self) -> bool {
        false
    }

    fn redis_bool(&self) -> &'static str {
        if self.is_truthy() && !self.is_literal_no() {
            "yes"
        } else {
            "no"
        }
    }
}

pub fn redis_bool<T: RedisBool + ?Sized>(value: &T) -> &'static str {
    value.redis_bool()
}

impl RedisBool for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl RedisBool for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }

    fn is_literal_no(&self) -> bool {
        self == "no"
    }
}

impl RedisBool for String {
    fn is_truthy(&self) -> bool {
        self.as_str().is_truthy()
    }

    fn is_literal_no(&self) -> bool {
        self.as_str().is_literal_no()
    }
}

impl<T: RedisBool + ?Sized> RedisBool for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }

    fn is_literal_no(&self) -> bool {
        (**self).is_literal_no()
    }
}

impl<T: RedisBool> RedisBool for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(RedisBool::is_truthy)
    }

    fn is_literal_no(&self) -> bool {
        self.as_ref().is_some_and(RedisBool::is_literal_no)
    }
}

macro_rules! impl_redis_bool_for_int {
    ($($ty:ty),*) => {
        $(
            impl RedisBool for $ty {
                fn is_truthy(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

impl_redis_bool_for_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Snapshot triggers: "after `seconds` if at least `changes` keys changed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavePolicy {
    pairs: Vec<(u64, u64)>,
}

impl SavePolicy {
    pub fn new(pairs: Vec<(u64, u64)>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(u64, u64)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromStr for SavePolicy {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = |reason: &str| FixtureError::MalformedSavePolicy {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let tokens: Vec<&str> = s.split_whitespace().collect();
        if !tokens
            .iter()
            .all(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(malformed("all save arguments should be numbers"));
        }
        if tokens.len() % 2 != 0 {
            return Err(malformed(
                "there should be even number of elements passed to save",
            ));
        }

        let numbers = tokens
            .iter()
            .map(|t| t.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| malformed("save argument out of range"))?;

        let pairs = numbers.chunks_exact(2).map(|c| (c[0], c[1])).collect();
        Ok(SavePolicy { pairs })
    }
}

impl fmt::Display for SavePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (seconds, changes)) in self.pairs.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{seconds} {changes}")?;
        }
        Ok(())
    }
}

/// Files a server instance leaves in its data directory, keyed by port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub datadir: PathBuf,
    pub unixsocket: PathBuf,
    pub logfile: PathBuf,
    pub pidfile: PathBuf,
    pub dbfilename: String,
}

impl Artifacts {
    pub fn new(datadir: &Path, port: u16) -> Self {
        Self {
            datadir: datadir.to_path_buf(),
            unixsocket: datadir.join(format!("redis.{port}.sock")),
            logfile: datadir.join(format!("redis-server.{port}.log")),
            pidfile: datadir.join(format!("redis-server.{port}.pid")),
            dbfilename: format!("dump.{port}.rdb"),
        }
    }

    pub fn dumpfile(&self) -> PathBuf {
        self.datadir.join(&self.dbfilename)
    }
}

/// Reject socket paths the kernel would refuse to bind.
pub fn check_unixsocket_length(path: &Path) -> Result<()> {
    if path.as_os_str().len() > MAX_UNIXSOCKET {
        return Err(FixtureError::UnixSocketTooLong {
            path: path.to_path_buf(),
            limit: MAX_UNIXSOCKET,
        });
    }
    Ok(())
}

/// Everything needed to launch one managed `redis-server`.
#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub executable: PathBuf,
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub databases: u32,
    /// Idle client timeout passed as `--timeout`, in seconds.
    pub redis_timeout: u64,
    pub loglevel: RedisLogLevel,
    pub save: SavePolicy,
    pub rdbcompression: bool,
    pub rdbchecksum: bool,
    pub syslog_enabled: bool,
    pub modules: Vec<PathBuf>,
    pub datadir: PathBuf,
    /// Budget for both startup readiness and graceful shutdown.
    pub startup_timeout: Duration,
}

impl RedisSettings {
    pub fn new(
        executable: impl Into<PathBuf>,
        host: impl Into<String>,
        port: u16,
        datadir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executable: executable.into(),
            host: host.into(),
            port,
            username: None,
            password: None,
            databases: 8,
            redis_timeout: 30,
            loglevel: RedisLogLevel::Notice,
            save: SavePolicy::default(),
            rdbcompression: true,
            rdbchecksum: false,
            syslog_enabled: false,
            modules: Vec::new(),
            datadir: datadir.into(),
            startup_timeout: Duration::from_secs(60),
        }
    }

    pub fn artifacts(&self) -> Artifacts {
        Artifacts::new(&self.datadir, self.port)
    }
}

/// Build the full argv (program first) for `settings` against `version`.
pub fn build_command(settings: &RedisSettings, version: &Version) -> Vec<OsString> {
    let artifacts = settings.artifacts();
    let mut argv: Vec<OsString> = vec![settings.executable.clone().into()];

    let mut push = |flag: &str, value: OsString| {
        argv.push(flag.into());
        argv.push(value);
    };

    push("--daemonize", "no".into());
    push("--rdbcompression", redis_bool(&settings.rdbcompression).into());
    push("--rdbchecksum", redis_bool(&settings.rdbchecksum).into());
    push("--appendonly", "no".into());
    push("--databases", settings.databases.to_string().into());
    push("--timeout", settings.redis_timeout.to_string().into());
    push("--pidfile", artifacts.pidfile.clone().into());
    push("--unixsocket", artifacts.unixsocket.clone().into());
    push("--dbfilename", artifacts.dbfilename.clone().into());
    push("--logfile", artifacts.logfile.clone().into());
    push("--loglevel", settings.loglevel.as_str().into());
    push("--syslog-enabled", redis_bool(&settings.syslog_enabled).into());
    push("--bind", settings.host.clone().into());
    push("--port", settings.port.to_string().into());
    push("--dir", artifacts.datadir.clone().into());

    if let Some(password) = settings.password.as_deref().filter(|p| !p.is_empty()) {
        push("--requirepass", password.into());
    }

    for module in &settings.modules {
        push("--loadmodule", module.clone().into());
    }

    if !settings.save.is_empty() {
        if version.major() < SINGLE_SAVE_FLAG_MAJOR {
            for (seconds, changes) in settings.save.pairs() {
                argv.push("--save".into());
                argv.push(seconds.to_string().into());
                argv.push(changes.to_string().into());
            }
        } else {
            argv.push("--save".into());
            argv.push(settings.save.to_string().into());
        }
    }

    argv
}
