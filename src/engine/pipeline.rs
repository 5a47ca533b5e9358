// src/engine/pipeline.rs

//! The change-detection-to-launch pipeline.
//!
//! One call to [`Orchestrator::run_pipeline`]:
//!
//! 1. captures `now` once and computes `since` from the configured duration
//! 2. asks the change source for repositories pushed since then
//! 3. applies the include / exclude prefix filter
//! 4. plans invocations (one for the batch, or one per repository)
//! 5. launches them in order, stopping at the first failure
//! 6. optionally waits for every launched job to stop
//!
//! Nothing is persisted between calls: a re-run recomputes its window from
//! its own `now`.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::RunConfig;
use crate::errors::{RepolaunchError, Result};
use crate::launch::{Invocation, LaunchPlan, LaunchResult, TaskLauncher, TaskRuntime};
use crate::repos::{ChangeQuery, ChangeSource};
use crate::wait::{CompletionWaiter, ProgressSink, WaitSpec, WaitSummary};
use crate::window::{Clock, LookbackWindow};

/// What a single pipeline run saw and did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub window: LookbackWindow,
    /// Repositories that passed the prefix filter, in source order.
    pub candidates: Vec<String>,
    /// Invocations planned for the candidates (logged only in a dry run).
    pub planned: Vec<Invocation>,
    pub launched: Vec<LaunchResult>,
    /// Present when the run waited for its jobs.
    pub waited: Option<WaitSummary>,
    pub dry_run: bool,
}

impl RunReport {
    /// Every job identifier started by this run, in launch order.
    pub fn job_ids(&self) -> Vec<String> {
        self.launched
            .iter()
            .flat_map(|r| r.jobs.iter().cloned())
            .collect()
    }
}

/// Owns the immutable configuration and the collaborators for the pipeline.
pub struct Orchestrator {
    config: Arc<RunConfig>,
    plan: LaunchPlan,
    access_token: Option<String>,
    source: Arc<dyn ChangeSource>,
    runtime: Arc<dyn TaskRuntime>,
    clock: Arc<dyn Clock>,
    progress: Option<Arc<dyn ProgressSink>>,
}

impl Orchestrator {
    pub fn new(
        config: RunConfig,
        source: Arc<dyn ChangeSource>,
        runtime: Arc<dyn TaskRuntime>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let plan = LaunchPlan::new(
            config.launch.clone(),
            config.task_per_repo,
            config.command_template.clone(),
        );

        Self {
            config: Arc::new(config),
            plan,
            access_token: None,
            source,
            runtime,
            clock,
            progress: None,
        }
    }

    /// GitHub token already dereferenced from its secret URI.
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    /// Sink for per-poll progress observations while waiting.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub async fn run_pipeline(&self, cancel: &CancellationToken) -> Result<RunReport> {
        let cfg = &self.config;

        let window = LookbackWindow::from_expr(self.clock.as_ref(), &cfg.updated_since)?;
        info!(
            organization = %cfg.organization,
            since = %window.since.to_rfc3339(),
            "looking for updated repositories"
        );

        let query = ChangeQuery {
            organization: cfg.organization.clone(),
            since: window.since,
            access_token: self.access_token.clone(),
        };

        let changed = self
            .source
            .list_changed_repositories(&query)
            .await
            .map_err(|source| RepolaunchError::ChangeSource {
                organization: cfg.organization.clone(),
                source,
            })?;

        let candidates = cfg.filter.apply(changed);

        let mut report = RunReport {
            window,
            candidates,
            planned: Vec::new(),
            launched: Vec::new(),
            waited: None,
            dry_run: cfg.dry_run,
        };

        if report.candidates.is_empty() {
            info!(organization = %cfg.organization, "no updated repositories; nothing to launch");
            return Ok(report);
        }

        info!(
            count = report.candidates.len(),
            repos = %report.candidates.join(","),
            "one or more repositories have been updated"
        );

        report.planned = self.plan.invocations(&report.candidates);

        if cfg.dry_run {
            for invocation in &report.planned {
                info!(
                    task = %invocation.request.task,
                    container = %invocation.request.container,
                    invocation = %invocation.label(),
                    command = %invocation.command.join(" "),
                    "[dryrun] would launch task"
                );
            }
            return Ok(report);
        }

        let launcher = TaskLauncher::new(Arc::clone(&self.runtime));
        report.launched = launcher.launch_all(&report.planned).await?;

        if let Some(settings) = cfg.wait {
            let mut spec = WaitSpec::new(
                cfg.launch.cluster.clone(),
                report.job_ids(),
                settings.timeout,
                settings.interval,
            );
            if let Some(sink) = &self.progress {
                spec = spec.with_progress(Arc::clone(sink));
            }

            let waiter = CompletionWaiter::new(Arc::clone(&self.runtime), Arc::clone(&self.clock));
            report.waited = Some(waiter.wait(&spec, cancel).await?);
        }

        Ok(report)
    }
}
