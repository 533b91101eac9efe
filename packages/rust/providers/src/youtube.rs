//! YouTube Data API client: video metadata and video search.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use pathfinder_shared::{PathfinderError, Result, VideoProviderConfig};

use crate::{VideoMetadata, VideoMetadataProvider, VideoSearch, build_client, endpoint};

const PROVIDER: &str = "youtube";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    published_at: DateTime<Utc>,
}

/// Counts arrive as decimal strings; hidden counts are simply absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<Count>,
    like_count: Option<Count>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Count {
    Text(String),
    Number(u64),
}

impl Count {
    fn value(count: Option<&Count>) -> u64 {
        match count {
            Some(Count::Text(s)) => s.trim().parse().unwrap_or(0),
            Some(Count::Number(n)) => *n,
            None => 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the YouTube Data API v3.
///
/// Without an API key every call reports the provider as unavailable, which
/// the extraction pipeline turns into a fallback preview.
pub struct YouTubeClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(config: &VideoProviderConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }

    /// Whether requests can be made at all.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| PathfinderError::unavailable(PROVIDER, "no API key configured"))
    }

    async fn search(&self, query: &str) -> Result<Option<String>> {
        let key = self.api_key()?;
        let url = endpoint(&self.base_url, "search");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", "1"),
                ("relevanceLanguage", "en"),
                ("key", key),
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
            .map_err(|e| PathfinderError::parse(format!("youtube search response: {e}")))?;

        Ok(body
            .items
            .into_iter()
            .find_map(|item| item.id.video_id)
            .map(|id| format!("https://www.youtube.com/watch?v={id}")))
    }
}

#[async_trait]
impl VideoMetadataProvider for YouTubeClient {
    #[instrument(skip(self))]
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        let key = self.api_key()?;
        let url = endpoint(&self.base_url, "videos");

        let response = self
            .client
            .get(&url)
            .query(&[("part", "snippet,statistics"), ("id", video_id), ("key", key)])
            .send()
            .await
            .map_err(|e| PathfinderError::unavailable(PROVIDER, format!("{video_id}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PathfinderError::unavailable(
                PROVIDER,
                format!("{video_id}: HTTP {status}"),
            ));
        }

        let body: VideoListResponse = response.json().await.map_err(|e| {
            PathfinderError::unavailable(PROVIDER, format!("{video_id}: bad response: {e}"))
        })?;

        let item = body.items.into_iter().next().ok_or_else(|| {
            PathfinderError::unavailable(PROVIDER, format!("{video_id}: video not found"))
        })?;

        let meta = VideoMetadata {
            published_at: item.snippet.published_at,
            view_count: Count::value(item.statistics.view_count.as_ref()),
            like_count: Count::value(item.statistics.like_count.as_ref()),
        };
        debug!(?meta, "fetched video metadata");
        Ok(meta)
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn find_video(&self, query: &str) -> Option<String> {
        match self.search(query).await {
            Ok(found) => found,
            Err(e) => {
                warn!(query, error = %e, "video search failed");
                None
            }
        }
    }
}
