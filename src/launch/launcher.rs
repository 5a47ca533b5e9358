// src/launch/launcher.rs

//! Issue planned invocations against a [`TaskRuntime`].

use std::sync::Arc;

use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, info};

use super::request::{Invocation, InvocationTarget};
use super::runtime::TaskRuntime;
use crate::errors::{RepolaunchError, Result};

/// Outcome of one successful invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchResult {
    pub target: InvocationTarget,
    pub jobs: Vec<String>,
    pub raw: serde_json::Value,
}

/// Starts invocations one at a time.
///
/// No retries happen here: a failed call, or a call that reports success but
/// started no jobs, is surfaced as [`RepolaunchError::Launch`] immediately.
#[derive(Clone)]
pub struct TaskLauncher {
    runtime: Arc<dyn TaskRuntime>,
}

impl TaskLauncher {
    pub fn new(runtime: Arc<dyn TaskRuntime>) -> Self {
        Self { runtime }
    }

    pub async fn launch(&self, invocation: &Invocation) -> Result<LaunchResult> {
        let label = invocation.label();
        debug!(invocation = %label, command = ?invocation.command, "launching task");

        let response = self
            .runtime
            .launch(invocation)
            .await
            .map_err(|source| RepolaunchError::Launch {
                target: label.clone(),
                source,
            })?;

        if response.jobs.is_empty() {
            return Err(RepolaunchError::Launch {
                target: label,
                source: anyhow!("runtime reported success but started no tasks"),
            });
        }

        info!(
            task = %invocation.request.task,
            invocation = %label,
            jobs = %response.jobs.join(","),
            "launched task"
        );

        Ok(LaunchResult {
            target: invocation.target.clone(),
            jobs: response.jobs,
            raw: response.raw,
        })
    }

    /// Launch every invocation in order, stopping at the first failure.
    ///
    /// Results of invocations launched before the failure are dropped; the
    /// error names the invocation that failed.
    pub async fn launch_all(&self, invocations: &[Invocation]) -> Result<Vec<LaunchResult>> {
        let mut results = Vec::with_capacity(invocations.len());
        for invocation in invocations {
            results.push(self.launch(invocation).await?);
        }
        Ok(results)
    }
}
