//! Third-party provider clients and the quality rules applied to their data.
//!
//! Two kinds of collaborators live here:
//! - metadata providers ([`VideoMetadataProvider`], [`CodeHostMetadataProvider`])
//!   answer "is this link still worth showing?" and feed [`validate`]
//! - search providers ([`VideoSearch`], [`RepoSearch`], [`ArticleSearch`]) find
//!   new links for a topic; they degrade to "nothing found" instead of failing
//!
//! Concrete clients: [`YouTubeClient`], [`GitHubClient`], [`TavilyClient`].

mod github;
mod tavily;
pub mod validate;
mod youtube;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;

use pathfinder_extract::RepoPath;
use pathfinder_shared::{PathfinderError, Result};

pub use github::GitHubClient;
pub use tavily::TavilyClient;
pub use youtube::YouTubeClient;

/// User-Agent string for provider requests. The code host rejects requests without one.
const USER_AGENT: &str = concat!("pathfinder/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow on provider requests.
const MAX_REDIRECTS: usize = 3;

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Freshness and popularity facts about a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
}

/// Freshness and popularity facts about a code repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMetadata {
    pub updated_at: DateTime<Utc>,
    pub star_count: u64,
    pub archived: bool,
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Looks up video metadata by video identifier.
///
/// Any error (network, timeout, missing video) is treated by callers as
/// "provider unavailable", never as a rejection.
#[async_trait]
pub trait VideoMetadataProvider: Send + Sync {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata>;
}

/// Looks up repository metadata by `owner/repo`.
#[async_trait]
pub trait CodeHostMetadataProvider: Send + Sync {
    async fn repo_metadata(&self, repo: &RepoPath) -> Result<RepoMetadata>;
}

/// Finds a single video for a free-text query.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Returns a watch URL, or `None` when nothing was found or the search failed.
    async fn find_video(&self, query: &str) -> Option<String>;
}

/// Finds popular repositories for a topic.
#[async_trait]
pub trait RepoSearch: Send + Sync {
    /// Returns up to `limit` repository URLs, best first. Empty on failure.
    async fn find_repos(&self, topic: &str, limit: u32) -> Vec<String>;
}

/// Finds articles for a free-text query.
#[async_trait]
pub trait ArticleSearch: Send + Sync {
    /// Returns up to `limit` article URLs. Empty on failure.
    async fn find_articles(&self, query: &str, limit: u32) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a reqwest client with a bounded timeout.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(timeout)
        .build()
        .map_err(|e| PathfinderError::Network(format!("failed to build HTTP client: {e}")))
}

/// Join a base URL and a path without doubling slashes.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
