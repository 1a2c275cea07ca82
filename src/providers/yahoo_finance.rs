use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::util::with_retry;
use crate::core::cache::Cache;
use crate::core::price::{PriceProvider, PriceResult};

const RETRIES: usize = 2;
const RETRY_DELAY_MS: u64 = 250;

/// Quote lookup against the Yahoo Finance chart endpoint.
pub struct YahooFinanceProvider {
    base_url: String,
    cache: Arc<Cache<String, PriceResult>>,
    client: reqwest::Client,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, cache: Arc<Cache<String, PriceResult>>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("apexx/0.1")
            .build()
            .unwrap_or_default();
        YahooFinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            client,
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooPriceResponse {
    chart: PriceChartResult,
}

#[derive(Deserialize, Debug)]
struct PriceChartResult {
    result: Option<Vec<PriceChartItem>>,
}

#[derive(Deserialize, Debug)]
struct PriceChartItem {
    meta: PriceChartMeta,
}

#[derive(Deserialize, Debug)]
struct PriceChartMeta {
    #[serde(alias = "regularMarketPrice")]
    regular_market_price: f64,
    currency: String,
    #[serde(alias = "shortName")]
    short_name: Option<String>,
    #[serde(alias = "regularMarketTime")]
    regular_market_time: Option<i64>,
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooPriceFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_price(&self, symbol: &str) -> Result<PriceResult> {
        let symbol = symbol.to_uppercase();
        if let Some(cached) = self.cache.get(&symbol).await {
            return Ok(cached);
        }

        let url = format!(
            "{}/v8/finance/chart/{}?interval=1d&range=1d",
            self.base_url, symbol
        );
        debug!("Requesting price data from {}", url);

        let response = with_retry(|| self.client.get(&url).send(), RETRIES, RETRY_DELAY_MS)
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooPriceResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let item = data
            .chart
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))?;

        let result = PriceResult {
            price: item.meta.regular_market_price,
            currency: item.meta.currency,
            short_name: item.meta.short_name,
            as_of: item
                .meta
                .regular_market_time
                .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
        };

        self.cache.put(symbol, result.clone()).await;
        Ok(result)
    }
}
