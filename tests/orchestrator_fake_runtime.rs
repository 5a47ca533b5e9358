use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tokio_util::sync::CancellationToken;

use repolaunch::config::RunConfig;
use repolaunch::engine::Orchestrator;
use repolaunch::errors::RepolaunchError;
use repolaunch::launch::InvocationTarget;
use repolaunch::window::FixedClock;
use repolaunch_test_utils::builders::RunConfigBuilder;
use repolaunch_test_utils::fakes::{FakeChangeSource, FakeTaskRuntime};
use repolaunch_test_utils::{RecordingProgress, init_tracing};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn orchestrator(
    config: RunConfig,
    source: &FakeChangeSource,
    runtime: &FakeTaskRuntime,
) -> Orchestrator {
    Orchestrator::new(
        config,
        Arc::new(source.clone()),
        Arc::new(runtime.clone()),
        Arc::new(FixedClock::new(now())),
    )
}

#[tokio::test]
async fn query_uses_window_computed_from_now() {
    init_tracing();
    let source = FakeChangeSource::with_repos(&[]);
    let runtime = FakeTaskRuntime::new();

    let config = RunConfigBuilder::new().organization("whosonfirst-data").build();
    let orch = orchestrator(config, &source, &runtime)
        .with_access_token(Some("s3cr3t".into()));

    let report = orch.run_pipeline(&CancellationToken::new()).await.unwrap();

    let queries = source.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].organization, "whosonfirst-data");
    assert_eq!(queries[0].since, now() - TimeDelta::hours(24));
    assert_eq!(queries[0].access_token.as_deref(), Some("s3cr3t"));
    assert_eq!(report.window.now, now());
}

#[tokio::test]
async fn no_candidates_is_a_successful_no_op() {
    let source = FakeChangeSource::with_repos(&["sfomuseum-data-flights"]);
    let runtime = FakeTaskRuntime::new();

    let config = RunConfigBuilder::new()
        .include("whosonfirst-data-")
        .wait("PT1M", "PT1S")
        .build();
    let report = orchestrator(config, &source, &runtime)
        .run_pipeline(&CancellationToken::new())
        .await
        .unwrap();

    assert!(report.candidates.is_empty());
    assert!(report.planned.is_empty());
    assert!(report.launched.is_empty());
    assert!(report.waited.is_none());
    assert_eq!(runtime.launch_count(), 0);
    assert_eq!(runtime.poll_count(), 0);
}

#[tokio::test]
async fn dry_run_plans_but_never_launches() {
    let source = FakeChangeSource::with_repos(&["wof-a", "wof-b", "wof-c"]);
    let runtime = FakeTaskRuntime::new();

    let config = RunConfigBuilder::new()
        .per_repo(true)
        .command("/bin/index.sh {repo}")
        .dry_run(true)
        .build();
    let report = orchestrator(config, &source, &runtime)
        .run_pipeline(&CancellationToken::new())
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.planned.len(), 3);
    assert_eq!(report.planned[2].command, vec!["/bin/index.sh", "wof-c"]);
    assert!(report.launched.is_empty());
    assert_eq!(runtime.launch_count(), 0);
}

#[tokio::test]
async fn batch_mode_launches_once_for_all_candidates() {
    let source = FakeChangeSource::with_repos(&["wof-a", "wof-b", "other"]);
    let runtime = FakeTaskRuntime::new();

    let config = RunConfigBuilder::new()
        .include("wof-")
        .command("/bin/index.sh --since PT24H")
        .build();
    let report = orchestrator(config, &source, &runtime)
        .run_pipeline(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.candidates, vec!["wof-a", "wof-b"]);
    assert_eq!(runtime.launch_count(), 1);

    let launched = runtime.launched();
    assert_eq!(launched[0].target, InvocationTarget::Batch);
    assert_eq!(launched[0].command, vec!["/bin/index.sh", "--since", "PT24H"]);
    assert_eq!(report.job_ids(), vec!["job-1"]);
}

#[tokio::test]
async fn per_repo_mode_launches_in_candidate_order() {
    let source = FakeChangeSource::with_repos(&["wof-c", "wof-a", "wof-b"]);
    let runtime = FakeTaskRuntime::new();

    let config = RunConfigBuilder::new()
        .per_repo(true)
        .command("/bin/index.sh {repo}")
        .build();
    let report = orchestrator(config, &source, &runtime)
        .run_pipeline(&CancellationToken::new())
        .await
        .unwrap();

    let labels: Vec<String> = runtime.launched().iter().map(|i| i.label()).collect();
    assert_eq!(labels, vec!["wof-c", "wof-a", "wof-b"]);
    assert_eq!(report.job_ids(), vec!["job-1", "job-2", "job-3"]);
}

#[tokio::test]
async fn per_repo_launch_failure_aborts_the_run() {
    let source = FakeChangeSource::with_repos(&["wof-a", "wof-b", "wof-c"]);
    let runtime = FakeTaskRuntime::new().failing_on("wof-b");

    let config = RunConfigBuilder::new()
        .per_repo(true)
        .wait("PT1M", "PT1S")
        .build();
    let err = orchestrator(config, &source, &runtime)
        .run_pipeline(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RepolaunchError::Launch { ref target, .. } if target == "wof-b"));
    assert_eq!(runtime.launch_count(), 2);
    assert_eq!(runtime.poll_count(), 0);
}

#[tokio::test]
async fn change_source_failure_names_the_organization() {
    let source = FakeChangeSource::failing();
    let runtime = FakeTaskRuntime::new();

    let config = RunConfigBuilder::new().organization("acme").build();
    let err = orchestrator(config, &source, &runtime)
        .run_pipeline(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RepolaunchError::ChangeSource { ref organization, .. } if organization == "acme"));
    assert_eq!(runtime.launch_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn waits_for_launched_jobs_when_enabled() {
    let source = FakeChangeSource::with_repos(&["wof-a", "wof-b"]);
    let runtime = FakeTaskRuntime::new()
        .then_terminal(&["job-1"])
        .then_terminal(&["job-1", "job-2"]);
    let progress = RecordingProgress::default();

    let config = RunConfigBuilder::new()
        .per_repo(true)
        .wait("PT1M", "PT5S")
        .build();
    let report = orchestrator(config, &source, &runtime)
        .with_progress(Arc::new(progress.clone()))
        .run_pipeline(&CancellationToken::new())
        .await
        .unwrap();

    let waited = report.waited.expect("wait summary");
    assert_eq!(waited.jobs, 2);
    assert_eq!(waited.polls, 2);
    assert_eq!(waited.elapsed, Duration::from_secs(10));
    assert_eq!(progress.remaining_counts(), vec![1, 0]);
}

#[tokio::test(start_paused = true)]
async fn wait_timeout_surfaces_as_error() {
    let source = FakeChangeSource::with_repos(&["wof-a"]);
    let runtime = FakeTaskRuntime::new().then_terminal(&[]);

    let config = RunConfigBuilder::new().wait("PT30S", "PT10S").build();
    let err = orchestrator(config, &source, &runtime)
        .run_pipeline(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RepolaunchError::Timeout { remaining: 1, .. }));
}

#[tokio::test]
async fn rerun_recomputes_the_window() {
    let source = FakeChangeSource::with_repos(&[]);
    let runtime = FakeTaskRuntime::new();

    let config = RunConfigBuilder::new().updated_since("PT1H").build();
    let orch = orchestrator(config, &source, &runtime);

    orch.run_pipeline(&CancellationToken::new()).await.unwrap();
    orch.run_pipeline(&CancellationToken::new()).await.unwrap();

    let queries = source.queries();
    assert_eq!(queries.len(), 2);
    assert!(queries.iter().all(|q| q.since == now() - TimeDelta::hours(1)));
}

#[tokio::test]
async fn exclude_prefixes_drop_candidates_before_planning() {
    let source = FakeChangeSource::with_repos(&[
        "whosonfirst-data-admin-us",
        "whosonfirst-data-venue-us-ca",
        "whosonfirst-data-admin-fr",
    ]);
    let runtime = FakeTaskRuntime::new();

    let config = RunConfigBuilder::new()
        .include("whosonfirst-data-")
        .exclude("whosonfirst-data-venue-")
        .per_repo(true)
        .build();
    let report = orchestrator(config, &source, &runtime)
        .run_pipeline(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        report.candidates,
        vec!["whosonfirst-data-admin-us", "whosonfirst-data-admin-fr"]
    );
    let labels: Vec<String> = runtime.launched().iter().map(|i| i.label()).collect();
    assert_eq!(labels, report.candidates);
}
