//! GitHub REST API client: repository metadata and repository search.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use pathfinder_extract::RepoPath;
use pathfinder_shared::{CodeHostProviderConfig, PathfinderError, Result};

use crate::{CodeHostMetadataProvider, RepoMetadata, RepoSearch, build_client, endpoint};

const PROVIDER: &str = "github";

const ACCEPT: &str = "application/vnd.github.v3+json";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RepoResponse {
    updated_at: DateTime<Utc>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    archived: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    html_url: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the GitHub REST API. The token is optional.
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(config: &CodeHostProviderConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            token: config.token.clone(),
            base_url: config.base_url.clone(),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self
            .client
            .get(endpoint(&self.base_url, path))
            .header(reqwest::header::ACCEPT, ACCEPT);
        match &self.token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, format!("token {token}")),
            None => request,
        }
    }

    async fn search(&self, topic: &str, limit: u32) -> Result<Vec<String>> {
        let per_page = limit.to_string();
        let response = self
            .get("search/repositories")
            .query(&[
                ("q", topic),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PathfinderError::unavailable(PROVIDER, format!("search: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PathfinderError::unavailable(
                PROVIDER,
                format!("search: HTTP {status}"),
            ));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PathfinderError::parse(format!("github search response: {e}")))?;

        Ok(body
            .items
            .into_iter()
            .map(|item| item.html_url)
            .take(limit as usize)
            .collect())
    }
}

#[async_trait]
impl CodeHostMetadataProvider for GitHubClient {
    #[instrument(skip_all, fields(repo = %repo))]
    async fn repo_metadata(&self, repo: &RepoPath) -> Result<RepoMetadata> {
        let response = self
            .get(&format!("repos/{}/{}", repo.owner, repo.repo))
            .send()
            .await
            .map_err(|e| PathfinderError::unavailable(PROVIDER, format!("{repo}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PathfinderError::unavailable(
                PROVIDER,
                format!("{repo}: HTTP {status}"),
            ));
        }

        let body: RepoResponse = response.json().await.map_err(|e| {
            PathfinderError::unavailable(PROVIDER, format!("{repo}: bad response: {e}"))
        })?;

        let meta = RepoMetadata {
            updated_at: body.updated_at,
            star_count: body.stargazers_count,
            archived: body.archived,
        };
        debug!(?meta, "fetched repository metadata");
        Ok(meta)
    }
}

#[async_trait]
impl RepoSearch for GitHubClient {
    async fn find_repos(&self, topic: &str, limit: u32) -> Vec<String> {
        match self.search(topic, limit).await {
            Ok(found) => found,
            Err(e) => {
                warn!(topic, error = %e, "repository search failed");
                Vec::new()
            }
        }
    }
}
