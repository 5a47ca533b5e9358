// src/repos/mod.rs

//! Repository change detection.
//!
//! The pipeline asks a [`ChangeSource`] for the repositories of an
//! organization pushed since a given instant, then narrows them with a
//! [`PrefixFilter`].
//!
//! - [`filter`] holds the prefix filter (pure, no IO).
//! - [`github`] is the production source backed by the GitHub REST API.

pub mod filter;
pub mod github;

use chrono::{DateTime, Utc};

use crate::types::BoxFuture;

pub use filter::PrefixFilter;
pub use github::GitHubChangeSource;

/// Parameters for one change-source lookup.
#[derive(Debug, Clone)]
pub struct ChangeQuery {
    pub organization: String,
    pub since: DateTime<Utc>,
    pub access_token: Option<String>,
}

/// Lists repositories that changed within a time window.
///
/// Implementations only apply the time window; prefix filtering happens in
/// the pipeline so every source behaves the same way. The returned order is
/// the source's own order and is preserved downstream.
pub trait ChangeSource: Send + Sync {
    fn list_changed_repositories<'a>(
        &'a self,
        query: &'a ChangeQuery,
    ) -> BoxFuture<'a, anyhow::Result<Vec<String>>>;
}
