//! Alpha Vantage API client

use crate::error::{FinanceError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const PROVIDER: &str = "Alpha Vantage";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

/// Latest quote of a symbol (`GLOBAL_QUOTE`)
///
/// Numeric fields the provider left blank are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalQuote {
    pub symbol: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub price: Option<f64>,
    pub volume: Option<u64>,
    pub latest_trading_day: String,
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: String,
}

/// The quote object as Alpha Vantage spells it; any field may be missing
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: String,
    #[serde(rename = "02. open")]
    open: String,
    #[serde(rename = "03. high")]
    high: String,
    #[serde(rename = "04. low")]
    low: String,
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "06. volume")]
    volume: String,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: String,
    #[serde(rename = "08. previous close")]
    previous_close: String,
    #[serde(rename = "09. change")]
    change: String,
    #[serde(rename = "10. change percent")]
    change_percent: String,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `base_url` - Host to query, without the `/query` path
    /// * `rate_limit` - Maximum requests per minute (5 on the free tier)
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        rate_limit: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Get the latest quote of `symbol`
    pub async fn get_global_quote(&self, symbol: &str) -> Result<GlobalQuote> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let url = format!("{}/query", self.base_url);
        debug!(symbol, "Requesting global quote");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(symbol, status = status.as_u16(), "Alpha Vantage request failed");
            return Err(FinanceError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await?;
        parse_global_quote(symbol, &data)
    }
}

/// Extract the quote from a `GLOBAL_QUOTE` response body
pub fn parse_global_quote(symbol: &str, data: &Value) -> Result<GlobalQuote> {
    // Check for API error messages
    if let Some(message) = data.get("Error Message").and_then(Value::as_str) {
        return Err(FinanceError::Provider {
            provider: PROVIDER,
            message: message.to_string(),
        });
    }

    // Throttled responses carry a "Note" (per minute) or "Information" (per day)
    if let Some(message) = data
        .get("Note")
        .or_else(|| data.get("Information"))
        .and_then(Value::as_str)
    {
        return Err(FinanceError::RateLimitExceeded {
            provider: PROVIDER,
            message: message.to_string(),
        });
    }

    let quote = match data.get("Global Quote") {
        Some(Value::Object(fields)) if !fields.is_empty() => Value::Object(fields.clone()),
        _ => return Err(FinanceError::NoData(symbol.to_string())),
    };

    let raw: RawGlobalQuote = serde_json::from_value(quote)?;
    Ok(GlobalQuote {
        open: number("open", &raw.open)?,
        high: number("high", &raw.high)?,
        low: number("low", &raw.low)?,
        price: number("price", &raw.price)?,
        volume: number("volume", &raw.volume)?,
        previous_close: number("previous close", &raw.previous_close)?,
        change: number("change", &raw.change)?,
        symbol: if raw.symbol.trim().is_empty() {
            symbol.to_string()
        } else {
            raw.symbol
        },
        latest_trading_day: raw.latest_trading_day,
        change_percent: raw.change_percent,
    })
}

/// Parse a numeric field; blank values are `None`
fn number<T>(field: &str, raw: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|e: T::Err| FinanceError::Provider {
            provider: PROVIDER,
            message: format!("invalid {field} '{raw}': {e}"),
        })
}
