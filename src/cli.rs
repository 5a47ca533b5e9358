// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every flag can also be set through a `REPOLAUNCH_*` environment variable
//! (handy for Lambda, where there is no command line). Flags left unset fall
//! back to the `--config` TOML file, then to built-in defaults; see
//! [`crate::config`].
//!
//! Boolean switches read their variable leniently: `1`, `t`, `yes`, `on`
//! and `true` enable them, `0`, `f`, `no`, `off` and `false` leave them off.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};

use crate::types::InvocationMode;

/// Command-line arguments for `repolaunch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "repolaunch",
    version,
    about = "Launch ECS tasks for GitHub repositories updated within a recent time window.",
    long_about = None
)]
pub struct CliArgs {
    /// How to run: once from the command line, or as an AWS Lambda handler.
    #[arg(long, value_enum, env = "REPOLAUNCH_MODE", default_value = "cli")]
    pub mode: InvocationMode,

    /// Optional TOML config file with `[github]`, `[ecs]` and `[run]` sections.
    #[arg(long, value_name = "PATH", env = "REPOLAUNCH_CONFIG")]
    pub config: Option<String>,

    /// The GitHub organization to poll for recently updated repositories.
    #[arg(long, env = "REPOLAUNCH_GITHUB_ORGANIZATION")]
    pub github_organization: Option<String>,

    /// Prefixes a repository name must match (any of). Repeatable or comma-separated.
    #[arg(long, env = "REPOLAUNCH_GITHUB_PREFIX", value_delimiter = ',')]
    pub github_prefix: Vec<String>,

    /// Prefixes a repository name must NOT match. Repeatable or comma-separated.
    #[arg(long, env = "REPOLAUNCH_GITHUB_EXCLUDE", value_delimiter = ',')]
    pub github_exclude: Vec<String>,

    /// Secret URI (env://, file://, constant://) that dereferences to a GitHub API token.
    #[arg(long, value_name = "URI", env = "REPOLAUNCH_GITHUB_ACCESS_TOKEN_URI")]
    pub github_access_token_uri: Option<String>,

    /// ISO-8601 duration of the lookback window (e.g. PT24H).
    #[arg(long, value_name = "DURATION", env = "REPOLAUNCH_GITHUB_UPDATED_SINCE")]
    pub github_updated_since: Option<String>,

    /// Base URL of the GitHub REST API.
    #[arg(long, value_name = "URL", env = "REPOLAUNCH_GITHUB_API_URL")]
    pub github_api_url: Option<String>,

    /// The name (and revision) of the ECS task definition.
    #[arg(long, env = "REPOLAUNCH_ECS_TASK")]
    pub ecs_task: Option<String>,

    /// The container whose command is overridden.
    #[arg(long, env = "REPOLAUNCH_ECS_CONTAINER")]
    pub ecs_container: Option<String>,

    /// The ECS cluster to run tasks in.
    #[arg(long, env = "REPOLAUNCH_ECS_CLUSTER")]
    pub ecs_cluster: Option<String>,

    /// ECS launch type (FARGATE, EC2, EXTERNAL).
    #[arg(long, env = "REPOLAUNCH_ECS_LAUNCH_TYPE")]
    pub ecs_launch_type: Option<String>,

    /// ECS platform version (Fargate only).
    #[arg(long, env = "REPOLAUNCH_ECS_PLATFORM_VERSION")]
    pub ecs_platform_version: Option<String>,

    /// Assign a public IP (ENABLED or DISABLED).
    #[arg(long, env = "REPOLAUNCH_ECS_PUBLIC_IP")]
    pub ecs_public_ip: Option<String>,

    /// Subnets to run tasks in. Repeatable or comma-separated.
    #[arg(long, env = "REPOLAUNCH_ECS_SUBNET", value_delimiter = ',')]
    pub ecs_subnet: Vec<String>,

    /// Security groups to run tasks under. Repeatable or comma-separated.
    #[arg(long, env = "REPOLAUNCH_ECS_SECURITY_GROUP", value_delimiter = ',')]
    pub ecs_security_group: Vec<String>,

    /// Command override for the container; `{repo}` is replaced per repository.
    #[arg(long, env = "REPOLAUNCH_ECS_TASK_COMMAND")]
    pub ecs_task_command: Option<String>,

    /// AWS region for the ECS client (defaults to the SDK's resolution chain).
    #[arg(long, env = "REPOLAUNCH_AWS_REGION")]
    pub aws_region: Option<String>,

    /// Named AWS profile for the ECS client.
    #[arg(long, env = "REPOLAUNCH_AWS_PROFILE")]
    pub aws_profile: Option<String>,

    /// Launch one task per updated repository instead of one for the batch.
    #[arg(long, env = "REPOLAUNCH_TASK_PER_REPO", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub task_per_repo: bool,

    /// Wait for launched tasks to stop before exiting.
    #[arg(long, env = "REPOLAUNCH_WAIT", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub wait: bool,

    /// ISO-8601 duration to wait for tasks before giving up (e.g. PT30M).
    #[arg(long, value_name = "DURATION", env = "REPOLAUNCH_WAIT_TIMEOUT")]
    pub wait_timeout: Option<String>,

    /// ISO-8601 duration between task status polls (e.g. PT10S).
    #[arg(long, value_name = "DURATION", env = "REPOLAUNCH_WAIT_INTERVAL")]
    pub wait_interval: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REPOLAUNCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Go through the motions but do not launch any tasks.
    #[arg(long, env = "REPOLAUNCH_DRY_RUN", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
