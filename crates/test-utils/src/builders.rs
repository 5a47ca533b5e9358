use repolaunch::config::{RawConfigFile, RunConfig};
use repolaunch::launch::LaunchRequest;
use repolaunch::types::{LaunchType, PublicIp};

/// Builder for `RunConfig` to simplify test setup.
///
/// Starts from a complete, launchable configuration (task, container,
/// cluster and one subnet set) so tests only spell out what they vary.
pub struct RunConfigBuilder {
    config: RawConfigFile,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.github.organization = "example-org".to_string();
        config.ecs.task = "indexer:1".to_string();
        config.ecs.container = "indexer".to_string();
        config.ecs.cluster = "test-cluster".to_string();
        config.ecs.subnets = vec!["subnet-1".to_string()];
        config.ecs.security_groups = vec!["sg-1".to_string()];
        Self { config }
    }

    pub fn organization(mut self, org: &str) -> Self {
        self.config.github.organization = org.to_string();
        self
    }

    pub fn include(mut self, prefix: &str) -> Self {
        self.config.github.prefix.push(prefix.to_string());
        self
    }

    pub fn exclude(mut self, prefix: &str) -> Self {
        self.config.github.exclude.push(prefix.to_string());
        self
    }

    pub fn updated_since(mut self, duration: &str) -> Self {
        self.config.github.updated_since = duration.to_string();
        self
    }

    pub fn command(mut self, template: &str) -> Self {
        self.config.ecs.task_command = Some(template.to_string());
        self
    }

    pub fn per_repo(mut self, val: bool) -> Self {
        self.config.run.task_per_repo = val;
        self
    }

    pub fn dry_run(mut self, val: bool) -> Self {
        self.config.run.dry_run = val;
        self
    }

    /// Enable waiting with ISO-8601 timeout and interval strings.
    pub fn wait(mut self, timeout: &str, interval: &str) -> Self {
        self.config.run.wait = true;
        self.config.run.wait_timeout = timeout.to_string();
        self.config.run.wait_interval = interval.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> RunConfig {
        RunConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A launch request with fixed, recognisable values.
pub fn sample_request() -> LaunchRequest {
    LaunchRequest {
        task: "indexer:1".to_string(),
        container: "indexer".to_string(),
        cluster: "test-cluster".to_string(),
        launch_type: LaunchType::Fargate,
        platform_version: "1.4.0".to_string(),
        public_ip: PublicIp::Enabled,
        subnets: vec!["subnet-1".to_string()],
        security_groups: vec!["sg-1".to_string()],
    }
}
