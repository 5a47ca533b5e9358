// src/launch/ecs.rs

//! Amazon ECS task runtime.
//!
//! - `launch` maps an [`Invocation`] onto `RunTask` with an awsvpc network
//!   configuration and a container override.
//! - `list_terminal_jobs` pages through `ListTasks` with
//!   `desiredStatus = STOPPED`.

use anyhow::Context;
use aws_sdk_ecs::Client;
use aws_sdk_ecs::config::Region;
use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, ContainerOverride, DesiredStatus, LaunchType,
    NetworkConfiguration, TaskOverride,
};
use serde_json::json;
use tracing::{debug, warn};

use super::request::Invocation;
use super::runtime::{LaunchResponse, TaskRuntime};
use crate::types::{BoxFuture, LaunchType as RequestedLaunchType};

/// Task runtime backed by the ECS API.
#[derive(Debug, Clone)]
pub struct EcsTaskRuntime {
    client: Client,
}

impl EcsTaskRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the standard AWS configuration chain, optionally
    /// pinning the region and/or named profile.
    pub async fn from_env(region: Option<String>, profile: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;
        Self::new(Client::new(&config))
    }

    async fn run_task(&self, invocation: &Invocation) -> anyhow::Result<LaunchResponse> {
        let request = &invocation.request;

        let vpc = AwsVpcConfiguration::builder()
            .set_subnets(Some(request.subnets.clone()))
            .set_security_groups(Some(request.security_groups.clone()))
            .assign_public_ip(AssignPublicIp::from(request.public_ip.as_str()))
            .build()
            .context("building awsvpc network configuration")?;

        let command = if invocation.command.is_empty() {
            None
        } else {
            Some(invocation.command.clone())
        };

        let overrides = TaskOverride::builder()
            .container_overrides(
                ContainerOverride::builder()
                    .name(&request.container)
                    .set_command(command)
                    .build(),
            )
            .build();

        let mut call = self
            .client
            .run_task()
            .cluster(&request.cluster)
            .task_definition(&request.task)
            .launch_type(LaunchType::from(request.launch_type.as_str()))
            .network_configuration(
                NetworkConfiguration::builder()
                    .awsvpc_configuration(vpc)
                    .build(),
            )
            .overrides(overrides);

        // Platform versions only apply to Fargate.
        if request.launch_type == RequestedLaunchType::Fargate {
            call = call.platform_version(&request.platform_version);
        }

        let output = call
            .send()
            .await
            .with_context(|| format!("RunTask {} in cluster {}", request.task, request.cluster))?;

        let jobs: Vec<String> = output
            .tasks()
            .iter()
            .filter_map(|t| t.task_arn().map(str::to_string))
            .collect();

        let failures: Vec<serde_json::Value> = output
            .failures()
            .iter()
            .map(|f| json!({ "arn": f.arn(), "reason": f.reason(), "detail": f.detail() }))
            .collect();

        if !failures.is_empty() {
            warn!(
                task = %request.task,
                cluster = %request.cluster,
                ?failures,
                "RunTask reported failures"
            );
        }

        let raw = json!({
            "tasks": output
                .tasks()
                .iter()
                .map(|t| json!({ "taskArn": t.task_arn(), "lastStatus": t.last_status() }))
                .collect::<Vec<_>>(),
            "failures": failures,
        });

        Ok(LaunchResponse { jobs, raw })
    }

    async fn stopped_tasks(&self, cluster: &str) -> anyhow::Result<Vec<String>> {
        let mut arns = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_tasks()
                .cluster(cluster)
                .desired_status(DesiredStatus::Stopped)
                .set_next_token(next_token.take())
                .send()
                .await
                .with_context(|| format!("ListTasks in cluster {cluster}"))?;

            arns.extend(output.task_arns().iter().cloned());

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(cluster, stopped = arns.len(), "listed stopped tasks");
        Ok(arns)
    }
}

impl TaskRuntime for EcsTaskRuntime {
    fn launch<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, anyhow::Result<LaunchResponse>> {
        Box::pin(self.run_task(invocation))
    }

    fn list_terminal_jobs<'a>(
        &'a self,
        cluster: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Vec<String>>> {
        Box::pin(self.stopped_tasks(cluster))
    }
}
