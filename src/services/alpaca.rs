//! Alpaca REST market data provider (daily stock bars)

use crate::config::MarketDataConfig;
use crate::models::{PriceBar, PriceSeries};
use crate::services::errors::{ClientInitError, FetchError};
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Deserialize)]
struct BarsResponse {
    #[serde(default)]
    bars: Option<Vec<AlpacaBar>>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    #[serde(rename = "t")]
    timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    open: f64,
    #[serde(rename = "h")]
    high: f64,
    #[serde(rename = "l")]
    low: f64,
    #[serde(rename = "c")]
    close: f64,
    #[serde(rename = "v")]
    volume: f64,
}

pub struct AlpacaMarketData {
    client: Client,
    base_url: String,
    feed: String,
}

impl AlpacaMarketData {
    /// Build the provider with the API key headers installed on every request
    pub fn new(config: MarketDataConfig, timeout: Duration) -> Result<Self, ClientInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(config.api_key_id.expose_secret())?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(config.api_secret_key.expose_secret())?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self::with_client(config.base_url, config.feed, client))
    }

    pub fn with_client(base_url: impl Into<String>, feed: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            feed: feed.into(),
        }
    }

    async fn fetch_page(
        &self,
        symbol: &str,
        start: &str,
        page_token: Option<&str>,
    ) -> Result<BarsResponse, FetchError> {
        let url = format!("{}/v2/stocks/{}/bars", self.base_url, symbol);
        let mut query: Vec<(&str, String)> = vec![
            ("timeframe", "1Day".to_string()),
            ("start", start.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
            ("adjustment", "split".to_string()),
            ("feed", self.feed.clone()),
        ];
        if let Some(token) = page_token {
            query.push(("page_token", token.to_string()));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_status(status, symbol, body));
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Schema(e.to_string()))
    }
}

fn classify_status(status: StatusCode, symbol: &str, body: String) -> FetchError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Unauthorized(body),
        StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            FetchError::UnknownSymbol(symbol.to_string())
        }
        _ => FetchError::Server {
            status: status.as_u16(),
            message: body,
        },
    }
}

/// Sort by time and drop repeated timestamps before validating the series
fn into_series(symbol: &str, bars: Vec<AlpacaBar>) -> Result<PriceSeries, FetchError> {
    let mut bars: Vec<PriceBar> = bars
        .into_iter()
        .map(|b| PriceBar::new(b.open, b.high, b.low, b.close, b.volume, b.timestamp))
        .collect();
    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);

    Ok(PriceSeries::new(symbol, bars)?)
}

#[async_trait]
impl MarketDataProvider for AlpacaMarketData {
    async fn fetch(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries, FetchError> {
        let start = (Utc::now() - chrono::Duration::days(i64::from(lookback_days)))
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self
                .fetch_page(symbol, &start, page_token.as_deref())
                .await?;
            bars.extend(page.bars.unwrap_or_default());

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(symbol = %symbol, count = bars.len(), "Alpaca: fetched {} bars for {}", bars.len(), symbol);
        into_series(symbol, bars)
    }
}
