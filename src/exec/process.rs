// src/exec/process.rs

//! Ownership of one spawned OS process.

use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use anyhow::Context;
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::Result;

/// A child process owned by exactly one executor.
///
/// The child is spawned with `kill_on_drop(true)`, so dropping this value
/// without calling [`ManagedProcess::terminate`] still kills it.
#[derive(Debug)]
pub struct ManagedProcess {
    child: Child,
    pid: Option<u32>,
    command_line: String,
}

impl ManagedProcess {
    /// Spawn `argv[0]` with the remaining tokens as arguments.
    pub fn spawn(argv: &[OsString]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .context("cannot spawn an empty command")?;
        let command_line = render_command_line(argv);

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .with_context(|| format!("spawning process: {command_line}"))?;
        let pid = child.id();

        info!(pid, command = %command_line, "spawned process");

        Ok(Self {
            child,
            pid,
            command_line,
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Non-blocking check; returns the exit status once the child is gone.
    pub fn exit_status(&mut self) -> Result<Option<ExitStatus>> {
        let status = self
            .child
            .try_wait()
            .with_context(|| format!("polling process {:?}", self.pid))?;
        Ok(status)
    }

    pub fn has_exited(&mut self) -> bool {
        !matches!(self.child.try_wait(), Ok(None))
    }

    /// Ask the process to exit, wait up to `grace`, then kill it. Always reaps.
    pub async fn terminate(mut self, grace: Duration) -> Result<ExitStatus> {
        if let Some(status) = self.exit_status()? {
            debug!(pid = self.pid, %status, "process already exited");
            return Ok(status);
        }

        self.send_sigterm();

        match timeout(grace, self.child.wait()).await {
            Ok(status) => {
                let status = status.with_context(|| format!("waiting for process {:?}", self.pid))?;
                info!(pid = self.pid, %status, "process stopped");
                Ok(status)
            }
            Err(_) => {
                warn!(
                    pid = self.pid,
                    ?grace,
                    "process did not exit after SIGTERM, sending SIGKILL"
                );
                self.child
                    .kill()
                    .await
                    .with_context(|| format!("killing process {:?}", self.pid))?;
                let status = self
                    .child
                    .wait()
                    .await
                    .with_context(|| format!("reaping process {:?}", self.pid))?;
                Ok(status)
            }
        }
    }

    #[cfg(unix)]
    fn send_sigterm(&mut self) {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        let Some(pid) = self.pid else {
            return;
        };
        if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            warn!(pid, error = %e, "failed to send SIGTERM");
        }
    }

    #[cfg(not(unix))]
    fn send_sigterm(&mut self) {
        if let Err(e) = self.child.start_kill() {
            warn!(pid = self.pid, error = %e, "failed to terminate process");
        }
    }
}

fn render_command_line(argv: &[OsString]) -> String {
    argv.iter()
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
