// src/wait/mod.rs

//! Completion waiter: poll the task runtime until a known set of launched
//! jobs has stopped.
//!
//! State machine:
//!
//! ```text
//! Waiting --tick--> Polling --+--> Waiting   (jobs still pending)
//!                             +--> Complete  (pending set empty)
//!   any state --deadline--------> TimedOut
//!   any state --cancel----------> Cancelled
//! ```
//!
//! The tick is a `tokio::time::interval` and the deadline a single pinned
//! `tokio::time::sleep`, both owned by [`CompletionWaiter::wait`] and dropped
//! when it returns. Both run on Tokio's clock, so tests drive them with a
//! paused runtime instead of real time.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::errors::{RepolaunchError, Result};
use crate::launch::TaskRuntime;
use crate::window::Clock;

/// Receives one observation per poll.
pub trait ProgressSink: Send + Sync {
    fn observe(&self, at: DateTime<Utc>, remaining: usize);
}

/// Progress sink that logs each observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn observe(&self, at: DateTime<Utc>, remaining: usize) {
        info!(at = %at.to_rfc3339(), remaining, "tasks remaining");
    }
}

/// What to wait for, and for how long.
///
/// The tracked job set is fixed at construction; the waiter only ever
/// shrinks its own pending copy.
#[derive(Clone)]
pub struct WaitSpec {
    pub cluster: String,
    jobs: BTreeSet<String>,
    pub timeout: Duration,
    pub interval: Duration,
    pub progress: Option<Arc<dyn ProgressSink>>,
}

impl WaitSpec {
    pub fn new<I, S>(cluster: impl Into<String>, jobs: I, timeout: Duration, interval: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cluster: cluster.into(),
            jobs: jobs.into_iter().map(Into::into).collect(),
            timeout,
            interval,
            progress: None,
        }
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn jobs(&self) -> &BTreeSet<String> {
        &self.jobs
    }
}

impl fmt::Debug for WaitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitSpec")
            .field("cluster", &self.cluster)
            .field("jobs", &self.jobs)
            .field("timeout", &self.timeout)
            .field("interval", &self.interval)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Summary of a wait that completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitSummary {
    pub jobs: usize,
    pub polls: u32,
    pub elapsed: Duration,
}

/// Polls a [`TaskRuntime`] for stopped jobs.
#[derive(Clone)]
pub struct CompletionWaiter {
    runtime: Arc<dyn TaskRuntime>,
    clock: Arc<dyn Clock>,
}

impl CompletionWaiter {
    pub fn new(runtime: Arc<dyn TaskRuntime>, clock: Arc<dyn Clock>) -> Self {
        Self { runtime, clock }
    }

    /// Block until every tracked job is terminal, the timeout elapses
    /// ([`RepolaunchError::Timeout`]) or `cancel` fires
    /// ([`RepolaunchError::Cancelled`]).
    ///
    /// A zero `interval` is rejected with [`RepolaunchError::Config`].
    ///
    /// The first poll happens one interval after the call. When the deadline
    /// and a tick are due at the same instant the deadline wins, so a wait
    /// never outlives its timeout. Cancellation is also honoured while a
    /// poll is in flight.
    pub async fn wait(&self, spec: &WaitSpec, cancel: &CancellationToken) -> Result<WaitSummary> {
        if spec.interval.is_zero() {
            return Err(RepolaunchError::Config(
                "wait interval must be greater than zero".to_string(),
            ));
        }

        let started = Instant::now();
        let mut pending: BTreeSet<&str> = spec.jobs.iter().map(String::as_str).collect();
        let mut polls: u32 = 0;

        if pending.is_empty() {
            return Ok(WaitSummary {
                jobs: 0,
                polls,
                elapsed: Duration::ZERO,
            });
        }

        info!(
            cluster = %spec.cluster,
            jobs = pending.len(),
            timeout = ?spec.timeout,
            interval = ?spec.interval,
            "waiting for tasks to complete"
        );

        let deadline = tokio::time::sleep(spec.timeout);
        tokio::pin!(deadline);

        let mut ticker = tokio::time::interval_at(started + spec.interval, spec.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    return Err(RepolaunchError::Cancelled { remaining: pending.len() });
                }
                _ = &mut deadline => {
                    return Err(RepolaunchError::Timeout {
                        remaining: pending.len(),
                        timeout: spec.timeout,
                    });
                }
                _ = ticker.tick() => {}
            }

            let terminal = tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    return Err(RepolaunchError::Cancelled { remaining: pending.len() });
                }
                _ = &mut deadline => {
                    return Err(RepolaunchError::Timeout {
                        remaining: pending.len(),
                        timeout: spec.timeout,
                    });
                }
                polled = self.runtime.list_terminal_jobs(&spec.cluster) => {
                    polled.map_err(|source| RepolaunchError::Wait {
                        cluster: spec.cluster.clone(),
                        source,
                    })?
                }
            };
            polls += 1;

            // Removing from the pending set means a job seen on several polls
            // is only ever counted once.
            for job in &terminal {
                pending.remove(job.as_str());
            }

            let remaining = pending.len();
            debug!(cluster = %spec.cluster, poll = polls, remaining, "polled task status");

            if let Some(sink) = &spec.progress {
                sink.observe(self.clock.now(), remaining);
            }

            if remaining == 0 {
                let elapsed = started.elapsed();
                info!(
                    cluster = %spec.cluster,
                    jobs = spec.jobs.len(),
                    polls,
                    elapsed = ?elapsed,
                    "all tasks completed"
                );
                return Ok(WaitSummary {
                    jobs: spec.jobs.len(),
                    polls,
                    elapsed,
                });
            }
        }
    }
}
