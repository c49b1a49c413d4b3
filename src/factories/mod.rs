// src/factories/mod.rs

//! Fixture-facing constructors.
//!
//! These merge a [`crate::config::RedisConfig`] with per-fixture overrides
//! (explicit values win) and hand back an executor that has not been started
//! yet. Pair them with [`crate::executor::with_executor`] for guaranteed
//! teardown.

pub mod client;
pub mod noproc;
pub mod port;
pub mod proc;

pub use client::ClientParams;
pub use noproc::{NoprocOptions, redis_noproc};
pub use port::PortSpec;
pub use proc::{ProcOptions, redis_proc};
