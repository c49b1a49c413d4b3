// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and overlay environment overrides (`loader.rs`).
//! - Validate the flat record (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_env_overrides, load_and_validate, load_from_path};
pub use model::{ConfigFile, RawConfigFile, RedisConfig};
pub use validate::validate_redis_config;
