//! Tool for searching the web for financial news

use agent_core::Result as AgentResult;
use agent_tools::{Tool, schema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::SerperClient;
use crate::error::Result;

/// Most results a single search may return
const MAX_RESULTS: usize = 10;

/// Web search through Serper
pub struct NewsSearchTool {
    client: Arc<SerperClient>,
    default_query: String,
    default_limit: usize,
}

#[derive(Debug, Default, Deserialize)]
struct NewsSearchParams {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

impl NewsSearchTool {
    pub fn new(
        client: Arc<SerperClient>,
        default_query: impl Into<String>,
        default_limit: usize,
    ) -> Self {
        Self {
            client,
            default_query: default_query.into(),
            default_limit,
        }
    }

    async fn search(&self, params: NewsSearchParams) -> Result<Value> {
        let query = params
            .query
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| self.default_query.clone());
        let limit = params
            .limit
            .unwrap_or(self.default_limit)
            .clamp(1, MAX_RESULTS);

        let results = self.client.search(&query, limit).await?;
        Ok(json!({
            "query": query,
            "count": results.len(),
            "results": results,
        }))
    }
}

#[async_trait]
impl Tool for NewsSearchTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: NewsSearchParams = if params.is_null() {
            NewsSearchParams::default()
        } else {
            serde_json::from_value(params)
                .map_err(|e| agent_core::Error::invalid_parameters(self.name(), e))?
        };

        self.search(params).await.map_err(Into::into)
    }

    fn name(&self) -> &str {
        super::SEARCH_NEWS
    }

    fn description(&self) -> &str {
        "Search the web for recent financial news. Returns the title and link of the top results."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "query": schema::string_with_default("Search query", &self.default_query),
                "limit": schema::integer("Number of results to return"),
            }),
            vec![],
        )
    }
}
