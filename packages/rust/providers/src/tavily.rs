//! Tavily search client for article discovery.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pathfinder_shared::{PathfinderError, Result, SearchConfig};

use crate::{ArticleSearch, build_client, endpoint};

const PROVIDER: &str = "tavily";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    url: Option<String>,
}

/// Client for the Tavily search API. Without a key, searches find nothing.
pub struct TavilyClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl TavilyClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            api_key: config.tavily_api_key.clone(),
            base_url: config.tavily_base_url.clone(),
        })
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PathfinderError::unavailable(PROVIDER, "no API key configured"))?;

        let response = self
            .client
            .post(endpoint(&self.base_url, "search"))
            .json(&SearchRequest {
                api_key,
                query,
                search_depth: "basic",
                max_results: limit,
            })
            .send()
            .await
            .map_err(|e| PathfinderError::unavailable(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PathfinderError::unavailable(PROVIDER, format!("HTTP {status}")));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PathfinderError::parse(format!("tavily response: {e}")))?;

        Ok(body
            .results
            .into_iter()
            .filter_map(|r| r.url)
            .filter(|u| !u.trim().is_empty())
            .take(limit as usize)
            .collect())
    }
}

#[async_trait]
impl ArticleSearch for TavilyClient {
    async fn find_articles(&self, query: &str, limit: u32) -> Vec<String> {
        match self.search(query, limit).await {
            Ok(found) => {
                info!(query, found = found.len(), "article search complete");
                found
            }
            Err(e) => {
                warn!(query, error = %e, "article search failed");
                Vec::new()
            }
        }
    }
}
