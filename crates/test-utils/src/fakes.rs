use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use repolaunch::launch::{Invocation, LaunchResponse, TaskRuntime};
use repolaunch::repos::{ChangeQuery, ChangeSource};
use repolaunch::types::BoxFuture;
use tokio::time::Instant;

/// A fake task runtime that:
/// - records every invocation it is asked to launch
/// - starts one job per launch (`job-1`, `job-2`, ...) unless told otherwise
/// - answers status polls from a script of terminal-job snapshots.
///
/// Clones share state, so a test can keep one handle and give another to
/// the code under test.
#[derive(Clone, Default)]
pub struct FakeTaskRuntime {
    inner: Arc<Mutex<RuntimeState>>,
}

#[derive(Default)]
struct RuntimeState {
    launched: Vec<Invocation>,
    next_job: usize,
    jobs_per_launch: Option<usize>,
    fail_labels: HashSet<String>,
    empty_labels: HashSet<String>,
    polls: VecDeque<Vec<String>>,
    last_poll: Vec<String>,
    poll_times: Vec<Instant>,
    fail_polls: bool,
}

impl FakeTaskRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `n` jobs per launch call (default 1).
    pub fn with_jobs_per_launch(self, n: usize) -> Self {
        self.inner.lock().unwrap().jobs_per_launch = Some(n);
        self
    }

    /// Fail the launch whose label (repository or task name) is `label`.
    pub fn failing_on(self, label: &str) -> Self {
        self.inner.lock().unwrap().fail_labels.insert(label.to_string());
        self
    }

    /// Report success but start no jobs for `label`.
    pub fn empty_on(self, label: &str) -> Self {
        self.inner.lock().unwrap().empty_labels.insert(label.to_string());
        self
    }

    /// Queue the terminal-job snapshot returned by the next unscripted poll.
    ///
    /// Once the script runs out, the last snapshot keeps being returned.
    pub fn then_terminal(self, jobs: &[&str]) -> Self {
        self.inner
            .lock()
            .unwrap()
            .polls
            .push_back(jobs.iter().map(|j| j.to_string()).collect());
        self
    }

    /// Make every status poll fail.
    pub fn failing_polls(self) -> Self {
        self.inner.lock().unwrap().fail_polls = true;
        self
    }

    pub fn launched(&self) -> Vec<Invocation> {
        self.inner.lock().unwrap().launched.clone()
    }

    pub fn launch_count(&self) -> usize {
        self.inner.lock().unwrap().launched.len()
    }

    pub fn poll_count(&self) -> usize {
        self.inner.lock().unwrap().poll_times.len()
    }

    /// Tokio instants at which polls happened (virtual time under a paused runtime).
    pub fn poll_times(&self) -> Vec<Instant> {
        self.inner.lock().unwrap().poll_times.clone()
    }
}

impl TaskRuntime for FakeTaskRuntime {
    fn launch<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, anyhow::Result<LaunchResponse>> {
        let result = {
            let mut state = self.inner.lock().unwrap();
            state.launched.push(invocation.clone());
            let label = invocation.label();

            if state.fail_labels.contains(&label) {
                Err(anyhow!("simulated RunTask failure for {label}"))
            } else if state.empty_labels.contains(&label) {
                Ok(LaunchResponse::default())
            } else {
                let count = state.jobs_per_launch.unwrap_or(1);
                let jobs: Vec<String> = (0..count)
                    .map(|_| {
                        state.next_job += 1;
                        format!("job-{}", state.next_job)
                    })
                    .collect();
                Ok(LaunchResponse {
                    raw: serde_json::json!({ "tasks": jobs }),
                    jobs,
                })
            }
        };

        Box::pin(async move { result })
    }

    fn list_terminal_jobs<'a>(
        &'a self,
        _cluster: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Vec<String>>> {
        let result = {
            let mut state = self.inner.lock().unwrap();
            state.poll_times.push(Instant::now());

            if state.fail_polls {
                Err(anyhow!("simulated ListTasks failure"))
            } else {
                if let Some(next) = state.polls.pop_front() {
                    state.last_poll = next;
                }
                Ok(state.last_poll.clone())
            }
        };

        Box::pin(async move { result })
    }
}

/// A change source that returns a fixed repository list (or an error) and
/// records the queries it receives.
#[derive(Clone, Default)]
pub struct FakeChangeSource {
    repos: Vec<String>,
    fail: bool,
    queries: Arc<Mutex<Vec<ChangeQuery>>>,
}

impl FakeChangeSource {
    pub fn with_repos(repos: &[&str]) -> Self {
        Self {
            repos: repos.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<ChangeQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl ChangeSource for FakeChangeSource {
    fn list_changed_repositories<'a>(
        &'a self,
        query: &'a ChangeQuery,
    ) -> BoxFuture<'a, anyhow::Result<Vec<String>>> {
        self.queries.lock().unwrap().push(query.clone());

        let result = if self.fail {
            Err(anyhow!("simulated GitHub outage"))
        } else {
            Ok(self.repos.clone())
        };

        Box::pin(async move { result })
    }
}
