// src/config/validate.rs

use crate::config::model::{RawConfigFile, RunConfig, WaitSettings};
use crate::errors::{RepolaunchError, Result};
use crate::launch::LaunchRequest;
use crate::repos::PrefixFilter;
use crate::types::{LaunchType, PublicIp};
use crate::window::IsoDuration;

impl TryFrom<RawConfigFile> for RunConfig {
    type Error = crate::errors::RepolaunchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_github(&raw)?;
        let launch = build_launch_request(&raw)?;
        let wait = build_wait_settings(&raw)?;

        let command_template = raw
            .ecs
            .task_command
            .filter(|c| !c.trim().is_empty());

        Ok(RunConfig {
            organization: raw.github.organization,
            filter: PrefixFilter::new(
                clean_list(raw.github.prefix),
                clean_list(raw.github.exclude),
            ),
            access_token_uri: raw.github.access_token_uri.filter(|u| !u.trim().is_empty()),
            updated_since: raw.github.updated_since,
            api_url: raw.github.api_url,
            launch,
            command_template,
            aws_region: raw.ecs.region,
            aws_profile: raw.ecs.profile,
            task_per_repo: raw.run.task_per_repo,
            dry_run: raw.run.dry_run,
            wait,
        })
    }
}

fn validate_github(cfg: &RawConfigFile) -> Result<()> {
    if cfg.github.organization.trim().is_empty() {
        return Err(RepolaunchError::Config(
            "[github].organization must not be empty".to_string(),
        ));
    }

    // Fail before any remote call if the window can't be computed.
    IsoDuration::parse(&cfg.github.updated_since)?;

    if cfg.github.api_url.trim().is_empty() {
        return Err(RepolaunchError::Config(
            "[github].api_url must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn build_launch_request(cfg: &RawConfigFile) -> Result<LaunchRequest> {
    let ecs = &cfg.ecs;

    let launch_type: LaunchType = ecs
        .launch_type
        .parse()
        .map_err(RepolaunchError::Config)?;
    let public_ip: PublicIp = ecs.public_ip.parse().map_err(RepolaunchError::Config)?;

    let subnets = clean_list(ecs.subnets.clone());
    let security_groups = clean_list(ecs.security_groups.clone());

    // A dry run never talks to ECS, so the launch target may be incomplete.
    if !cfg.run.dry_run {
        for (field, value) in [
            ("task", &ecs.task),
            ("container", &ecs.container),
            ("cluster", &ecs.cluster),
        ] {
            if value.trim().is_empty() {
                return Err(RepolaunchError::Config(format!(
                    "[ecs].{field} is required unless dry_run is set"
                )));
            }
        }

        if subnets.is_empty() {
            return Err(RepolaunchError::Config(
                "[ecs].subnets must contain at least one subnet unless dry_run is set".to_string(),
            ));
        }
    }

    Ok(LaunchRequest {
        task: ecs.task.trim().to_string(),
        container: ecs.container.trim().to_string(),
        cluster: ecs.cluster.trim().to_string(),
        launch_type,
        platform_version: ecs.platform_version.trim().to_string(),
        public_ip,
        subnets,
        security_groups,
    })
}

fn build_wait_settings(cfg: &RawConfigFile) -> Result<Option<WaitSettings>> {
    // Parse even when waiting is off so a typo surfaces early.
    let timeout = IsoDuration::parse(&cfg.run.wait_timeout)?.to_std();
    let interval = IsoDuration::parse(&cfg.run.wait_interval)?.to_std();

    if interval.is_zero() {
        return Err(RepolaunchError::Config(
            "[run].wait_interval must be greater than zero".to_string(),
        ));
    }

    if !cfg.run.wait {
        return Ok(None);
    }

    Ok(Some(WaitSettings { timeout, interval }))
}

/// Trim entries and drop empty ones (e.g. from `"a,,b"` or a trailing comma).
fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
