//! Stand-in `redis-server` executables.
//!
//! Each fake is a small `/bin/sh` script: it answers `--version` with a
//! canned banner and otherwise does whatever [`FakeBehaviour`] says. Good
//! enough to drive the version gate and the startup failure paths without a
//! real server.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// What the fake does when started as a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeBehaviour {
    /// Exit immediately with this status.
    Exit(i32),
    /// Keep running without ever listening.
    Hang,
    /// Keep running and ignore SIGTERM, so only SIGKILL stops it.
    IgnoreTerm,
}

pub struct FakeRedis {
    banner: String,
    behaviour: FakeBehaviour,
    hang_on_version: bool,
}

impl FakeRedis {
    /// A fake whose `--version` prints `banner` (may be empty).
    pub fn new(banner: &str) -> Self {
        Self {
            banner: banner.to_string(),
            behaviour: FakeBehaviour::Exit(1),
            hang_on_version: false,
        }
    }

    /// Banner in the format modern `redis-server --version` uses.
    pub fn with_version(version: &str) -> Self {
        Self::new(&format!(
            "Redis server v={version} sha=00000000:0 malloc=libc bits=64 build=0"
        ))
    }

    pub fn behaviour(mut self, behaviour: FakeBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    /// Never answer `--version`.
    pub fn hang_on_version(mut self) -> Self {
        self.hang_on_version = true;
        self
    }

    /// Write the script as `dir/redis-server` and make it executable.
    pub fn install(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("redis-server");
        let server_part = match self.behaviour {
            FakeBehaviour::Exit(code) => format!("exit {code}"),
            FakeBehaviour::Hang => "exec sleep 600".to_string(),
            FakeBehaviour::IgnoreTerm => {
                "trap '' TERM\nwhile true; do sleep 1; done".to_string()
            }
        };

        let banner_line = if self.hang_on_version {
            "exec sleep 600".to_string()
        } else if self.banner.is_empty() {
            String::new()
        } else {
            format!("printf '%s\\n' '{}'", self.banner.replace('\'', r"'\''"))
        };

        let script = format!(
            "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n{banner_line}\nexit 0\nfi\n{server_part}\n"
        );

        fs::write(&path, script)?;
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms)?;
        Ok(path)
    }
}
