// src/repos/github.rs

//! GitHub REST API change source.
//!
//! Pages through `GET /orgs/{org}/repos` sorted by push time (newest first)
//! and keeps every repository whose `pushed_at` is at or after the query's
//! `since`. Paging stops at the first older repository, since everything
//! after it is older still.

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use super::{ChangeQuery, ChangeSource};
use crate::types::BoxFuture;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: u32 = 100;
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// The subset of the repository payload we care about.
#[derive(Debug, Deserialize)]
struct RepoSummary {
    name: String,
    /// `null` for repositories that were never pushed to.
    pushed_at: Option<DateTime<Utc>>,
}

/// Change source backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubChangeSource {
    client: reqwest::Client,
    api_url: String,
}

impl GitHubChangeSource {
    /// Create a source talking to `api_url` (e.g. `https://api.github.com`
    /// or a GitHub Enterprise `https://host/api/v3`).
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    async fn fetch_page(
        &self,
        query: &ChangeQuery,
        page: u32,
    ) -> anyhow::Result<Vec<RepoSummary>> {
        let url = format!("{}/orgs/{}/repos", self.api_url, query.organization);

        let mut request = self
            .client
            .get(&url)
            .query(&[
                ("type", "all"),
                ("sort", "pushed"),
                ("direction", "desc"),
            ])
            .query(&[("per_page", PER_PAGE), ("page", page)])
            .header(USER_AGENT, concat!("repolaunch/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, GITHUB_ACCEPT);

        if let Some(token) = query.access_token.as_deref() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("requesting {url} (page {page})"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(anyhow!("GitHub API error ({}): {}", status.as_u16(), body));
        }

        response
            .json::<Vec<RepoSummary>>()
            .await
            .with_context(|| format!("decoding repository list from {url} (page {page})"))
    }

    async fn list_changed(&self, query: &ChangeQuery) -> anyhow::Result<Vec<String>> {
        let mut changed = Vec::new();
        let mut page = 1;

        loop {
            let repos = self.fetch_page(query, page).await?;
            debug!(
                organization = %query.organization,
                page,
                count = repos.len(),
                "fetched repository page"
            );

            if repos.is_empty() {
                break;
            }

            let full_page = repos.len() as u32 >= PER_PAGE;
            let mut reached_older = false;

            for repo in repos {
                match repo.pushed_at {
                    Some(pushed_at) if pushed_at >= query.since => changed.push(repo.name),
                    // Older, or never pushed (sorted last): nothing newer follows.
                    _ => {
                        reached_older = true;
                        break;
                    }
                }
            }

            if reached_older || !full_page {
                break;
            }
            page += 1;
        }

        Ok(changed)
    }
}

impl Default for GitHubChangeSource {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ChangeSource for GitHubChangeSource {
    fn list_changed_repositories<'a>(
        &'a self,
        query: &'a ChangeQuery,
    ) -> BoxFuture<'a, anyhow::Result<Vec<String>>> {
        Box::pin(self.list_changed(query))
    }
}
