//! Market data provider interface

use crate::models::PriceSeries;
use crate::services::errors::FetchError;
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataProvider {
    /// Daily bars for `symbol` covering roughly the last `lookback_days` calendar days,
    /// oldest first and without duplicate timestamps.
    async fn fetch(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries, FetchError>;
}
