// src/launch/request.rs

//! Launch request template and the concrete invocations built from it.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::types::{LaunchType, PublicIp};

/// Everything needed to start a task, except the command override.
///
/// Built once per run and shared (via `Arc`) by every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchRequest {
    /// Task definition name (and optional revision), e.g. `indexer:3`.
    pub task: String,
    /// Container whose command is overridden.
    pub container: String,
    pub cluster: String,
    pub launch_type: LaunchType,
    pub platform_version: String,
    pub public_ip: PublicIp,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
}

/// What a single invocation is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum InvocationTarget {
    /// One job for the whole batch of changed repositories.
    Batch,
    /// One job for a single repository.
    Repository(String),
}

impl fmt::Display for InvocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationTarget::Batch => f.write_str("batch"),
            InvocationTarget::Repository(name) => f.write_str(name),
        }
    }
}

/// One concrete request to start one or more jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub request: Arc<LaunchRequest>,
    pub target: InvocationTarget,
    /// Command override tokens; empty means "use the container default".
    pub command: Vec<String>,
}

impl Invocation {
    /// Human-readable label used in logs and errors: the repository name in
    /// per-item mode, the task definition otherwise.
    pub fn label(&self) -> String {
        match &self.target {
            InvocationTarget::Batch => self.request.task.clone(),
            InvocationTarget::Repository(name) => name.clone(),
        }
    }
}
