// src/exec/mod.rs

//! Generic process-launching and readiness-polling primitives.
//!
//! Nothing in here knows about Redis flags; the executors in
//! [`crate::executor`] compose these pieces:
//!
//! - [`poll`] owns deadlines and the short-timeout TCP probe.
//! - [`process`] wraps a spawned child with graceful-then-forceful shutdown.
//! - [`version_probe`] asks an executable for its `--version` banner.

pub mod poll;
pub mod process;
pub mod version_probe;

pub use poll::{Deadline, tcp_available, wait_for};
pub use process::ManagedProcess;
pub use version_probe::probe_version;
