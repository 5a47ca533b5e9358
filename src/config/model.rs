// src/config/model.rs

use serde::Deserialize;

use crate::launch::LaunchRequest;
use crate::repos::PrefixFilter;
use crate::repos::github::DEFAULT_API_URL;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [github]
/// organization = "whosonfirst-data"
/// prefix = ["whosonfirst-data-admin-"]
/// updated_since = "PT24H"
///
/// [ecs]
/// task = "indexer:3"
/// container = "indexer"
/// cluster = "default"
/// subnets = ["subnet-0abc"]
/// task_command = "/bin/index.sh {repo}"
///
/// [run]
/// task_per_repo = true
/// wait = true
/// ```
///
/// All sections are optional and have reasonable defaults. Command-line
/// flags and `REPOLAUNCH_*` variables are merged on top of this before
/// validation (see [`RawConfigFile::apply_cli`]).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub github: GithubSection,

    #[serde(default)]
    pub ecs: EcsSection,

    #[serde(default)]
    pub run: RunSection,
}

/// `[github]` section: where to look for changed repositories.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubSection {
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Include prefixes; empty means every repository qualifies.
    #[serde(default)]
    pub prefix: Vec<String>,

    /// Exclude prefixes.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Secret URI for the API token (`env://`, `file://`, `constant://`).
    #[serde(default)]
    pub access_token_uri: Option<String>,

    /// ISO-8601 duration of the lookback window.
    #[serde(default = "default_updated_since")]
    pub updated_since: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_organization() -> String {
    "whosonfirst-data".to_string()
}

fn default_updated_since() -> String {
    "PT24H".to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for GithubSection {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            prefix: Vec::new(),
            exclude: Vec::new(),
            access_token_uri: None,
            updated_since: default_updated_since(),
            api_url: default_api_url(),
        }
    }
}

/// `[ecs]` section: the launch request template.
#[derive(Debug, Clone, Deserialize)]
pub struct EcsSection {
    #[serde(default)]
    pub task: String,

    #[serde(default)]
    pub container: String,

    #[serde(default)]
    pub cluster: String,

    /// `"FARGATE"` (default), `"EC2"` or `"EXTERNAL"`.
    #[serde(default = "default_launch_type")]
    pub launch_type: String,

    #[serde(default = "default_platform_version")]
    pub platform_version: String,

    /// `"ENABLED"` (default) or `"DISABLED"`.
    #[serde(default = "default_public_ip")]
    pub public_ip: String,

    #[serde(default)]
    pub subnets: Vec<String>,

    #[serde(default)]
    pub security_groups: Vec<String>,

    /// Optional command override; `{repo}` is replaced in per-repo mode.
    #[serde(default)]
    pub task_command: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub profile: Option<String>,
}

fn default_launch_type() -> String {
    "FARGATE".to_string()
}

fn default_platform_version() -> String {
    "1.4.0".to_string()
}

fn default_public_ip() -> String {
    "ENABLED".to_string()
}

impl Default for EcsSection {
    fn default() -> Self {
        Self {
            task: String::new(),
            container: String::new(),
            cluster: String::new(),
            launch_type: default_launch_type(),
            platform_version: default_platform_version(),
            public_ip: default_public_ip(),
            subnets: Vec::new(),
            security_groups: Vec::new(),
            task_command: None,
            region: None,
            profile: None,
        }
    }
}

/// `[run]` section: launch granularity and waiting.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    #[serde(default)]
    pub task_per_repo: bool,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub wait: bool,

    #[serde(default = "default_wait_timeout")]
    pub wait_timeout: String,

    #[serde(default = "default_wait_interval")]
    pub wait_interval: String,
}

fn default_wait_timeout() -> String {
    "PT30M".to_string()
}

fn default_wait_interval() -> String {
    "PT10S".to_string()
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            task_per_repo: false,
            dry_run: false,
            wait: false,
            wait_timeout: default_wait_timeout(),
            wait_interval: default_wait_interval(),
        }
    }
}

/// Validated, immutable configuration for one process.
///
/// Built once at startup (see [`super::load_config`]) and passed explicitly
/// into the orchestrator.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub organization: String,
    pub filter: PrefixFilter,
    pub access_token_uri: Option<String>,
    /// Already checked to parse as an ISO-8601 duration.
    pub updated_since: String,
    pub api_url: String,

    pub launch: LaunchRequest,
    pub command_template: Option<String>,
    pub aws_region: Option<String>,
    pub aws_profile: Option<String>,

    pub task_per_repo: bool,
    pub dry_run: bool,
    /// `None` when waiting is disabled.
    pub wait: Option<WaitSettings>,
}

/// Timing for the completion waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    pub timeout: std::time::Duration,
    pub interval: std::time::Duration,
}
