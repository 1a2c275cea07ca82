//! Price lookup seam used to value portfolio holdings

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResult {
    pub price: f64,
    pub currency: String,
    pub short_name: Option<String>,
    /// Time of the quote, when the provider reports one.
    pub as_of: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<PriceResult>;
}
