// src/engine/triggered.rs

//! AWS Lambda adapter.
//!
//! Registers [`Orchestrator::run_pipeline`] as the handler for every
//! invocation. The event payload is ignored: each invocation computes a
//! fresh window from its own `now`, so scheduled triggers and manual re-runs
//! behave the same way. The run report is returned as the invocation result.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::pipeline::Orchestrator;

/// Stop waiting this long before Lambda's hard deadline so the handler can
/// still return its error.
const DEADLINE_MARGIN: Duration = Duration::from_secs(2);

/// Serve Lambda invocations until the runtime shuts the process down.
pub async fn serve(orchestrator: Orchestrator) -> anyhow::Result<()> {
    let orchestrator = Arc::new(orchestrator);

    let handler = service_fn(move |event: LambdaEvent<Value>| {
        let orchestrator = Arc::clone(&orchestrator);
        async move { handle(&orchestrator, event).await }
    });

    info!("serving Lambda invocations");
    lambda_runtime::run(handler)
        .await
        .map_err(|e| anyhow!("lambda runtime failed: {e}"))
}

/// Handle one Lambda invocation: run the pipeline with a wait budget taken
/// from the invocation deadline and return the run report as JSON.
pub async fn handle(
    orchestrator: &Orchestrator,
    event: LambdaEvent<Value>,
) -> Result<Value, lambda_runtime::Error> {
    let now_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
    let budget = invocation_budget(event.context.deadline, now_ms);
    handle_with_budget(orchestrator, &event.context.request_id, budget).await
}

/// Run the pipeline, cancelling any in-progress wait once `budget` elapses.
pub async fn handle_with_budget(
    orchestrator: &Orchestrator,
    request_id: &str,
    budget: Duration,
) -> Result<Value, lambda_runtime::Error> {
    info!(request_id = %request_id, budget = ?budget, "handling invocation");

    let cancel = CancellationToken::new();
    let deadline_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(budget).await;
            cancel.cancel();
        })
    };

    let result = orchestrator.run_pipeline(&cancel).await;
    deadline_task.abort();

    match result {
        Ok(report) => {
            info!(
                request_id = %request_id,
                candidates = report.candidates.len(),
                launched = report.launched.len(),
                "invocation complete"
            );
            Ok(serde_json::to_value(&report)?)
        }
        Err(err) => {
            warn!(request_id = %request_id, error = %err, "invocation failed");
            Err(err.into())
        }
    }
}

/// Time left before `deadline_ms` (epoch milliseconds), minus a safety margin.
pub fn invocation_budget(deadline_ms: u64, now_ms: u64) -> Duration {
    Duration::from_millis(deadline_ms.saturating_sub(now_ms)).saturating_sub(DEADLINE_MARGIN)
}
