// src/types.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::Serialize;

/// Boxed, sendable future returned by the collaborator traits.
///
/// The traits stay object-safe so the orchestrator can hold them as
/// `Arc<dyn ...>` and tests can swap in fakes.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How the process is driven.
///
/// - `Cli`: run the pipeline once and exit (default).
/// - `Lambda`: register the pipeline as an AWS Lambda handler and run it on
///   every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InvocationMode {
    #[default]
    Cli,
    Lambda,
}

/// ECS launch type for the started tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LaunchType {
    Fargate,
    Ec2,
    External,
}

impl Default for LaunchType {
    fn default() -> Self {
        LaunchType::Fargate
    }
}

impl LaunchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchType::Fargate => "FARGATE",
            LaunchType::Ec2 => "EC2",
            LaunchType::External => "EXTERNAL",
        }
    }
}

impl fmt::Display for LaunchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FARGATE" => Ok(LaunchType::Fargate),
            "EC2" => Ok(LaunchType::Ec2),
            "EXTERNAL" => Ok(LaunchType::External),
            other => Err(format!(
                "invalid launch type: {other} (expected FARGATE, EC2 or EXTERNAL)"
            )),
        }
    }
}

/// Whether tasks get a public IP in their awsvpc network configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PublicIp {
    Enabled,
    Disabled,
}

impl Default for PublicIp {
    fn default() -> Self {
        PublicIp::Enabled
    }
}

impl PublicIp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicIp::Enabled => "ENABLED",
            PublicIp::Disabled => "DISABLED",
        }
    }
}

impl fmt::Display for PublicIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicIp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ENABLED" => Ok(PublicIp::Enabled),
            "DISABLED" => Ok(PublicIp::Disabled),
            other => Err(format!(
                "invalid public IP setting: {other} (expected ENABLED or DISABLED)"
            )),
        }
    }
}
