// src/config/mod.rs

//! Configuration loading and validation for repolaunch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the validated `RunConfig`
//!   (`model.rs`).
//! - Load a config file from disk and overlay CLI / environment values
//!   (`loader.rs`).
//! - Validate durations, enums and the launch target (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_config, load_from_path};
pub use model::{EcsSection, GithubSection, RawConfigFile, RunConfig, RunSection, WaitSettings};
