//! Exercises the GitHub change source against a local axum server that
//! mimics `GET /orgs/{org}/repos`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::json;

use repolaunch::repos::{ChangeQuery, ChangeSource, GitHubChangeSource};

#[derive(Clone, Default)]
struct FakeGitHub {
    /// `(name, pushed_at)` newest first, as GitHub returns them for `sort=pushed`.
    repos: Arc<Vec<(String, Option<DateTime<Utc>>)>>,
    requests: Arc<Mutex<Vec<Request>>>,
    fail_with: Option<StatusCode>,
}

#[derive(Clone, Debug)]
struct Request {
    org: String,
    params: HashMap<String, String>,
    authorization: Option<String>,
}

async fn list_repos(
    State(state): State<FakeGitHub>,
    Path(org): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.requests.lock().unwrap().push(Request {
        org,
        params: params.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    if let Some(status) = state.fail_with {
        return (status, "{\"message\":\"Bad credentials\"}").into_response();
    }

    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: usize = params
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(30);

    let body: Vec<_> = state
        .repos
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .map(|(name, pushed_at)| {
            json!({
                "name": name,
                "full_name": format!("org/{name}"),
                "pushed_at": pushed_at.as_ref().map(|t| t.to_rfc3339()),
            })
        })
        .collect();

    Json(body).into_response()
}

async fn serve(state: FakeGitHub) -> String {
    let app = Router::new()
        .route("/orgs/{org}/repos", get(list_repos))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// `recent` repositories pushed within the last hour, then `old` ones pushed
/// days ago.
fn repos(recent: usize, old: usize) -> Vec<(String, Option<DateTime<Utc>>)> {
    let mut out = Vec::new();
    for i in 0..recent {
        out.push((format!("recent-{i:03}"), Some(now() - TimeDelta::seconds(i as i64))));
    }
    for i in 0..old {
        out.push((format!("old-{i:03}"), Some(now() - TimeDelta::days(3 + i as i64))));
    }
    out
}

fn query(token: Option<&str>) -> ChangeQuery {
    ChangeQuery {
        organization: "whosonfirst-data".to_string(),
        since: now() - TimeDelta::hours(24),
        access_token: token.map(str::to_string),
    }
}

#[tokio::test]
async fn stops_at_first_repository_older_than_since() {
    let state = FakeGitHub {
        repos: Arc::new(repos(3, 5)),
        ..FakeGitHub::default()
    };
    let url = serve(state.clone()).await;

    let source = GitHubChangeSource::new(url);
    let changed = source.list_changed_repositories(&query(None)).await.unwrap();

    assert_eq!(changed, vec!["recent-000", "recent-001", "recent-002"]);

    let requests = state.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].org, "whosonfirst-data");
    assert_eq!(requests[0].params.get("sort").map(String::as_str), Some("pushed"));
    assert_eq!(requests[0].params.get("direction").map(String::as_str), Some("desc"));
    assert_eq!(requests[0].params.get("per_page").map(String::as_str), Some("100"));
    assert!(requests[0].authorization.is_none());
}

#[tokio::test]
async fn follows_pages_while_every_repository_is_recent() {
    let state = FakeGitHub {
        repos: Arc::new(repos(150, 10)),
        ..FakeGitHub::default()
    };
    let url = serve(state.clone()).await;

    let source = GitHubChangeSource::new(url);
    let changed = source.list_changed_repositories(&query(None)).await.unwrap();

    assert_eq!(changed.len(), 150);
    assert_eq!(changed.first().map(String::as_str), Some("recent-000"));
    assert_eq!(changed.last().map(String::as_str), Some("recent-149"));

    let pages: Vec<String> = state
        .requests
        .lock()
        .unwrap()
        .iter()
        .filter_map(|r| r.params.get("page").cloned())
        .collect();
    assert_eq!(pages, vec!["1", "2"]);
}

#[tokio::test]
async fn exactly_one_full_page_asks_for_the_next_one() {
    let state = FakeGitHub {
        repos: Arc::new(repos(100, 0)),
        ..FakeGitHub::default()
    };
    let url = serve(state.clone()).await;

    let changed = GitHubChangeSource::new(url)
        .list_changed_repositories(&query(None))
        .await
        .unwrap();

    assert_eq!(changed.len(), 100);
    assert_eq!(state.requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn never_pushed_repositories_end_the_listing() {
    let mut list = repos(2, 0);
    list.push(("empty-repo".to_string(), None));
    list.push(("recent-late".to_string(), Some(now())));

    let state = FakeGitHub {
        repos: Arc::new(list),
        ..FakeGitHub::default()
    };
    let url = serve(state).await;

    let changed = GitHubChangeSource::new(url)
        .list_changed_repositories(&query(None))
        .await
        .unwrap();
    assert_eq!(changed, vec!["recent-000", "recent-001"]);
}

#[tokio::test]
async fn sends_bearer_token_when_configured() {
    let state = FakeGitHub {
        repos: Arc::new(repos(1, 0)),
        ..FakeGitHub::default()
    };
    let url = serve(state.clone()).await;

    GitHubChangeSource::new(format!("{url}/"))
        .list_changed_repositories(&query(Some("ghp_test")))
        .await
        .unwrap();

    let requests = state.requests.lock().unwrap().clone();
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer ghp_test"));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let state = FakeGitHub {
        fail_with: Some(StatusCode::UNAUTHORIZED),
        ..FakeGitHub::default()
    };
    let url = serve(state).await;

    let err = GitHubChangeSource::new(url)
        .list_changed_repositories(&query(Some("bad")))
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("401"), "unexpected error: {msg}");
    assert!(msg.contains("Bad credentials"), "unexpected error: {msg}");
}
