// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Collaborators (GitHub, ECS, secret stores) report failures as
//! `anyhow::Error`; the pipeline wraps them here together with the
//! identifier that makes the failure actionable (organization, repository,
//! cluster, duration string, ...).

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepolaunchError {
    #[error("invalid duration '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("failed to list changed repositories for {organization}")]
    ChangeSource {
        organization: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to launch task for {target}")]
    Launch {
        target: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to poll task status in cluster {cluster}")]
    Wait {
        cluster: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("timed out after {timeout:?} waiting for tasks; {remaining} still outstanding")]
    Timeout { remaining: usize, timeout: Duration },

    #[error("wait cancelled with {remaining} task(s) still outstanding")]
    Cancelled { remaining: usize },

    #[error("failed to resolve secret '{uri}': {reason}")]
    Secret { uri: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepolaunchError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        RepolaunchError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RepolaunchError>;
