use std::sync::Arc;

use repolaunch::errors::RepolaunchError;
use repolaunch::launch::{InvocationTarget, LaunchPlan, TaskLauncher};
use repolaunch_test_utils::builders::sample_request;
use repolaunch_test_utils::fakes::FakeTaskRuntime;
use repolaunch_test_utils::init_tracing;

fn per_repo_plan(repos: &[&str]) -> Vec<repolaunch::launch::Invocation> {
    let candidates: Vec<String> = repos.iter().map(|s| s.to_string()).collect();
    LaunchPlan::new(sample_request(), true, Some("/bin/index.sh {repo}".into()))
        .invocations(&candidates)
}

#[tokio::test]
async fn launch_returns_job_ids() {
    init_tracing();
    let runtime = FakeTaskRuntime::new().with_jobs_per_launch(2);
    let launcher = TaskLauncher::new(Arc::new(runtime.clone()));

    let invocations = per_repo_plan(&["repo-a"]);
    let result = launcher.launch(&invocations[0]).await.unwrap();

    assert_eq!(result.target, InvocationTarget::Repository("repo-a".into()));
    assert_eq!(result.jobs, vec!["job-1", "job-2"]);
    assert_eq!(runtime.launched()[0].command, vec!["/bin/index.sh", "repo-a"]);
}

#[tokio::test]
async fn success_without_jobs_is_a_launch_error() {
    let runtime = FakeTaskRuntime::new().empty_on("repo-a");
    let launcher = TaskLauncher::new(Arc::new(runtime));

    let invocations = per_repo_plan(&["repo-a"]);
    let err = launcher.launch(&invocations[0]).await.unwrap_err();

    match err {
        RepolaunchError::Launch { target, source } => {
            assert_eq!(target, "repo-a");
            assert!(source.to_string().contains("no tasks"));
        }
        other => panic!("expected Launch error, got {other:?}"),
    }
}

#[tokio::test]
async fn runtime_failure_names_the_target() {
    let runtime = FakeTaskRuntime::new().failing_on("repo-b");
    let launcher = TaskLauncher::new(Arc::new(runtime));

    let invocations = per_repo_plan(&["repo-b"]);
    let err = launcher.launch(&invocations[0]).await.unwrap_err();

    assert!(matches!(err, RepolaunchError::Launch { ref target, .. } if target == "repo-b"));
    assert!(err.to_string().contains("repo-b"));
}

#[tokio::test]
async fn launch_all_stops_at_first_failure() {
    let runtime = FakeTaskRuntime::new().failing_on("repo-b");
    let launcher = TaskLauncher::new(Arc::new(runtime.clone()));

    let invocations = per_repo_plan(&["repo-a", "repo-b", "repo-c"]);
    let err = launcher.launch_all(&invocations).await.unwrap_err();

    assert!(matches!(err, RepolaunchError::Launch { ref target, .. } if target == "repo-b"));

    let attempted: Vec<String> = runtime.launched().iter().map(|i| i.label()).collect();
    assert_eq!(attempted, vec!["repo-a", "repo-b"]);
}

#[tokio::test]
async fn launch_all_preserves_order() {
    let runtime = FakeTaskRuntime::new();
    let launcher = TaskLauncher::new(Arc::new(runtime));

    let results = launcher
        .launch_all(&per_repo_plan(&["x", "y", "z"]))
        .await
        .unwrap();

    let jobs: Vec<&str> = results.iter().map(|r| r.jobs[0].as_str()).collect();
    assert_eq!(jobs, vec!["job-1", "job-2", "job-3"]);
}
