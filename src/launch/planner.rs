// src/launch/planner.rs

//! Launch planning: turn the filtered candidates into concrete invocations.
//!
//! - Batch mode (`per_item = false`): exactly one invocation. The command
//!   template, if any, is split on whitespace once and used verbatim.
//! - Per-item mode (`per_item = true`): one invocation per candidate, in
//!   candidate order. [`REPO_PLACEHOLDER`] is replaced with the candidate's
//!   name before splitting. A template without the placeholder still yields
//!   one invocation per candidate, all with the same command.
//! - No template: every invocation carries an empty command override.

use std::sync::Arc;

use super::request::{Invocation, InvocationTarget, LaunchRequest};

/// Token in the command template replaced by the repository name.
pub const REPO_PLACEHOLDER: &str = "{repo}";

/// Inputs to the planner that are fixed for a whole run.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub request: Arc<LaunchRequest>,
    pub per_item: bool,
    pub command_template: Option<String>,
}

impl LaunchPlan {
    pub fn new(request: LaunchRequest, per_item: bool, command_template: Option<String>) -> Self {
        Self {
            request: Arc::new(request),
            per_item,
            // An empty template means "no override", same as not setting it.
            command_template: command_template.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Build the invocations for `candidates`.
    ///
    /// In batch mode this always returns one invocation, even for an empty
    /// candidate list; the orchestrator skips planning entirely in that case.
    pub fn invocations(&self, candidates: &[String]) -> Vec<Invocation> {
        if !self.per_item {
            let command = self
                .command_template
                .as_deref()
                .map(tokenize)
                .unwrap_or_default();

            return vec![Invocation {
                request: Arc::clone(&self.request),
                target: InvocationTarget::Batch,
                command,
            }];
        }

        candidates
            .iter()
            .map(|name| Invocation {
                request: Arc::clone(&self.request),
                target: InvocationTarget::Repository(name.clone()),
                command: self
                    .command_template
                    .as_deref()
                    .map(|template| render_command(template, name))
                    .unwrap_or_default(),
            })
            .collect()
    }
}

/// Substitute the repository name into the template, then tokenize.
pub fn render_command(template: &str, repo: &str) -> Vec<String> {
    tokenize(&template.replace(REPO_PLACEHOLDER, repo))
}

fn tokenize(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
