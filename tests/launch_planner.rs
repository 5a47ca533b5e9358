use repolaunch::launch::{InvocationTarget, LaunchPlan, render_command};
use repolaunch_test_utils::builders::sample_request;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn batch_mode_yields_a_single_invocation() {
    let plan = LaunchPlan::new(sample_request(), false, Some("/bin/index.sh --all".into()));

    let invocations = plan.invocations(&names(&["a", "b", "c"]));
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].target, InvocationTarget::Batch);
    assert_eq!(invocations[0].command, vec!["/bin/index.sh", "--all"]);
    assert_eq!(invocations[0].label(), "indexer:1");
}

#[test]
fn batch_mode_with_no_candidates_still_plans_one() {
    let plan = LaunchPlan::new(sample_request(), false, None);
    assert_eq!(plan.invocations(&[]).len(), 1);
}

#[test]
fn per_item_mode_substitutes_each_name() {
    let plan = LaunchPlan::new(
        sample_request(),
        true,
        Some("/bin/index.sh -repo {repo} -mode repo".into()),
    );

    let invocations = plan.invocations(&names(&["repo-a", "repo-b"]));
    assert_eq!(invocations.len(), 2);

    assert_eq!(
        invocations[0].target,
        InvocationTarget::Repository("repo-a".into())
    );
    assert_eq!(
        invocations[0].command,
        vec!["/bin/index.sh", "-repo", "repo-a", "-mode", "repo"]
    );
    assert_eq!(
        invocations[1].command,
        vec!["/bin/index.sh", "-repo", "repo-b", "-mode", "repo"]
    );

    // No invocation mentions another candidate's name.
    assert!(!invocations[0].command.iter().any(|t| t.contains("repo-b")));
    assert!(!invocations[1].command.iter().any(|t| t.contains("repo-a")));
}

#[test]
fn per_item_mode_without_template_has_empty_command() {
    let plan = LaunchPlan::new(sample_request(), true, None);
    let invocations = plan.invocations(&names(&["a", "b"]));

    assert_eq!(invocations.len(), 2);
    assert!(invocations.iter().all(|i| i.command.is_empty()));
    assert_eq!(invocations[1].label(), "b");
}

#[test]
fn blank_template_is_treated_as_none() {
    let plan = LaunchPlan::new(sample_request(), false, Some("   ".into()));
    assert!(plan.command_template.is_none());
    assert!(plan.invocations(&names(&["a"]))[0].command.is_empty());
}

#[test]
fn template_without_placeholder_repeats_the_same_command() {
    let plan = LaunchPlan::new(sample_request(), true, Some("/bin/rebuild".into()));
    let invocations = plan.invocations(&names(&["a", "b", "c"]));

    assert_eq!(invocations.len(), 3);
    for invocation in &invocations {
        assert_eq!(invocation.command, vec!["/bin/rebuild"]);
    }
}

#[test]
fn invocations_share_the_request() {
    let plan = LaunchPlan::new(sample_request(), true, None);
    let invocations = plan.invocations(&names(&["a", "b"]));
    assert!(std::sync::Arc::ptr_eq(
        &invocations[0].request,
        &invocations[1].request
    ));
}

#[test]
fn render_command_replaces_every_occurrence() {
    assert_eq!(
        render_command("sync {repo} --into /data/{repo}", "wof"),
        vec!["sync", "wof", "--into", "/data/wof"]
    );
}
