// src/exec/version_probe.rs

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::errors::{FixtureError, Result};

/// Run `<executable> --version` and return whatever it printed on stdout.
///
/// A missing or unrunnable executable, one that does not answer within
/// `limit`, and an empty banner all map to [`FixtureError::Misconfigured`];
/// making sense of the text is left to the caller. A child still running at
/// the limit is killed.
pub async fn probe_version(executable: &Path, limit: Duration) -> Result<String> {
    let query = Command::new(executable)
        .arg("--version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match timeout(limit, query).await {
        Ok(Ok(output)) => output,
        Err(_) => {
            warn!(executable = %executable.display(), ?limit, "version query timed out");
            return Err(FixtureError::Misconfigured {
                executable: executable.to_path_buf(),
            });
        }
        Ok(Err(e)) => {
            warn!(executable = %executable.display(), error = %e, "version query failed");
            return Err(FixtureError::Misconfigured {
                executable: executable.to_path_buf(),
            });
        }
    };

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.trim().is_empty() {
        return Err(FixtureError::Misconfigured {
            executable: executable.to_path_buf(),
        });
    }

    debug!(executable = %executable.display(), banner = %text.trim(), "version banner");
    Ok(text)
}
