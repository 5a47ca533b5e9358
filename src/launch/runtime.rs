// src/launch/runtime.rs

//! Pluggable task-runtime abstraction.
//!
//! The launcher and the completion waiter talk to a `TaskRuntime` instead of
//! an AWS client directly. This makes it easy to swap in a fake runtime in
//! tests while keeping the production implementation in [`super::ecs`].
//!
//! - `EcsTaskRuntime` is the default implementation used by `repolaunch`.
//! - Tests can provide their own `TaskRuntime` that, for example, records
//!   which invocations were issued and scripts which jobs are stopped.

use serde::Serialize;

use super::request::Invocation;
use crate::types::BoxFuture;

/// What the runtime reported for one launch call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaunchResponse {
    /// Opaque identifiers of the started jobs (ECS task ARNs).
    pub jobs: Vec<String>,
    /// Raw runtime response, kept for diagnostics.
    pub raw: serde_json::Value,
}

/// Trait abstracting how invocations are started and observed.
///
/// Production code uses [`super::EcsTaskRuntime`]; tests can provide their
/// own implementation that doesn't call AWS.
pub trait TaskRuntime: Send + Sync {
    /// Start the given invocation.
    ///
    /// An `Ok` with no jobs is passed through as-is; the launcher decides
    /// how to treat it.
    fn launch<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, anyhow::Result<LaunchResponse>>;

    /// Identifiers of every job in `cluster` that is currently in a
    /// terminal (stopped) state.
    fn list_terminal_jobs<'a>(
        &'a self,
        cluster: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Vec<String>>>;
}
