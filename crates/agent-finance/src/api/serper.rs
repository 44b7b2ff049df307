//! Serper web search client

use crate::error::{FinanceError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const PROVIDER: &str = "Serper";

/// One organic search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<NewsResult>,
}

/// Client for the Serper Google search API
#[derive(Debug, Clone)]
pub struct SerperClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerperClient {
    /// Create a new Serper client
    ///
    /// # Arguments
    /// * `api_key` - Serper API key, sent as `X-API-KEY`
    /// * `base_url` - Host to query, without the `/search` path
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Search the web and return the first `limit` organic results
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsResult>> {
        let url = format!("{}/search", self.base_url);
        debug!(query, limit, "Searching the web");

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Serper search failed");
            return Err(FinanceError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let mut results = response.json::<SearchResponse>().await?.organic;
        results.truncate(limit);
        Ok(results)
    }
}
