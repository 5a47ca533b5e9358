// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod launch;
pub mod logging;
pub mod repos;
pub mod secrets;
pub mod types;
pub mod wait;
pub mod window;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{RunConfig, load_config};
use crate::engine::Orchestrator;
use crate::launch::EcsTaskRuntime;
use crate::repos::GitHubChangeSource;
use crate::secrets::{UriSecretResolver, resolve_secret};
use crate::types::InvocationMode;
use crate::wait::TracingProgress;
use crate::window::SystemClock;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (flags, environment, optional TOML file)
/// - secret resolution for the GitHub token
/// - the GitHub change source and the ECS task runtime
/// - the orchestrator, driven once or per Lambda invocation
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;
    describe_config(&cfg);

    let access_token = match cfg.access_token_uri.as_deref() {
        Some(uri) => Some(resolve_secret(&UriSecretResolver, uri).await?),
        None => None,
    };

    let source = Arc::new(GitHubChangeSource::new(cfg.api_url.clone()));
    let runtime =
        Arc::new(EcsTaskRuntime::from_env(cfg.aws_region.clone(), cfg.aws_profile.clone()).await);

    let orchestrator = Orchestrator::new(cfg, source, runtime, Arc::new(SystemClock))
        .with_access_token(access_token)
        .with_progress(Arc::new(TracingProgress));

    match args.mode {
        InvocationMode::Cli => {
            let report = engine::run_once(&orchestrator).await?;
            info!(
                candidates = report.candidates.len(),
                planned = report.planned.len(),
                launched = report.launched.len(),
                jobs = report.job_ids().len(),
                "run complete"
            );
            Ok(())
        }
        InvocationMode::Lambda => engine::triggered::serve(orchestrator).await,
    }
}

fn describe_config(cfg: &RunConfig) {
    debug!(
        organization = %cfg.organization,
        include = ?cfg.filter.include,
        exclude = ?cfg.filter.exclude,
        updated_since = %cfg.updated_since,
        task = %cfg.launch.task,
        container = %cfg.launch.container,
        cluster = %cfg.launch.cluster,
        launch_type = %cfg.launch.launch_type,
        task_per_repo = cfg.task_per_repo,
        dry_run = cfg.dry_run,
        wait = ?cfg.wait,
        "configuration loaded"
    );
}
