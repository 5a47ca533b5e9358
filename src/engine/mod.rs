// src/engine/mod.rs

//! Orchestration engine for repolaunch.
//!
//! This module ties together:
//! - the lookback window (clock + duration parser)
//! - the change source and prefix filter
//! - the launch planner and launcher
//! - the completion waiter
//!
//! The pipeline itself lives in [`pipeline`]. It is driven by two thin
//! adapters: [`run_once`] for the command line and [`triggered::serve`] for
//! AWS Lambda. Both call the same [`Orchestrator::run_pipeline`].

pub mod pipeline;
pub mod triggered;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::Result;

pub use pipeline::{Orchestrator, RunReport};

/// Run the pipeline once, cancelling any wait on Ctrl-C.
pub async fn run_once(orchestrator: &Orchestrator) -> Result<RunReport> {
    let cancel = CancellationToken::new();

    // Ctrl-C → cooperative cancellation of the completion waiter.
    let signal_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            info!("Ctrl+C received; cancelling");
            cancel.cancel();
        })
    };

    let result = orchestrator.run_pipeline(&cancel).await;
    signal_task.abort();
    result
}
