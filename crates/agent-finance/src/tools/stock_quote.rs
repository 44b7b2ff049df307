//! Tool for fetching the latest stock quote

use agent_core::Result as AgentResult;
use agent_tools::{Tool, schema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use crate::api::AlphaVantageClient;
use crate::error::Result;

/// Latest quote from Alpha Vantage
pub struct StockQuoteTool {
    client: Arc<AlphaVantageClient>,
    default_symbol: String,
}

#[derive(Debug, Default, Deserialize)]
struct StockQuoteParams {
    #[serde(default)]
    symbol: Option<String>,
}

impl StockQuoteTool {
    pub fn new(client: Arc<AlphaVantageClient>, default_symbol: impl Into<String>) -> Self {
        Self {
            client,
            default_symbol: default_symbol.into(),
        }
    }

    async fn fetch_quote(&self, params: StockQuoteParams) -> Result<Value> {
        let symbol = params
            .symbol
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.default_symbol.clone())
            .trim()
            .to_uppercase();

        let quote = self.client.get_global_quote(&symbol).await?;
        info!(symbol = %quote.symbol, price = quote.price, "Fetched stock quote");
        Ok(serde_json::to_value(quote)?)
    }
}

#[async_trait]
impl Tool for StockQuoteTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: StockQuoteParams = if params.is_null() {
            StockQuoteParams::default()
        } else {
            serde_json::from_value(params)
                .map_err(|e| agent_core::Error::invalid_parameters(self.name(), e))?
        };

        self.fetch_quote(params).await.map_err(Into::into)
    }

    fn name(&self) -> &str {
        super::FETCH_STOCK_QUOTE
    }

    fn description(&self) -> &str {
        "Fetch the latest stock quote (price, open, high, low, volume, change) from Alpha Vantage."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "symbol": schema::string_with_default("Stock ticker symbol", &self.default_symbol),
            }),
            vec![],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn tool(server: &MockServer) -> StockQuoteTool {
        let client =
            AlphaVantageClient::new("demo", server.uri(), 60, Duration::from_secs(5)).unwrap();
        StockQuoteTool::new(Arc::new(client), "IBM")
    }

    #[tokio::test]
    async fn test_defaults_to_configured_symbol() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("symbol", "IBM"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Global Quote": {
                    "01. symbol": "IBM",
                    "02. open": "221.00",
                    "03. high": "223.94",
                    "04. low": "220.12",
                    "05. price": "222.97",
                    "06. volume": "3408203",
                    "07. latest trading day": "2026-10-13",
                    "08. previous close": "220.50",
                    "09. change": "2.47",
                    "10. change percent": "1.1202%"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let output = tool(&server).await.execute(json!({})).await.unwrap();
        assert_eq!(output["symbol"], "IBM");
        assert_eq!(output["volume"], 3_408_203);
    }

    #[tokio::test]
    async fn test_empty_quote_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Global Quote": {} })))
            .mount(&server)
            .await;

        let err = tool(&server)
            .await
            .execute(json!({ "symbol": "zzzz" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No data available for ZZZZ"));
    }

    #[tokio::test]
    async fn test_invalid_parameters() {
        let server = MockServer::start().await;
        let err = tool(&server)
            .await
            .execute(json!({ "symbol": 42 }))
            .await
            .unwrap_err();
        assert!(matches!(err, agent_core::Error::InvalidParameters { .. }));
    }
}
