//! Price bars and validated price series

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a sequence of bars cannot form a [`PriceSeries`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index} has a non-finite or negative {field}")]
    InvalidValue { index: usize, field: &'static str },

    #[error("bar {index} at {timestamp} does not follow its predecessor")]
    OutOfOrder {
        index: usize,
        timestamp: DateTime<Utc>,
    },
}

/// One OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl PriceBar {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }

    fn invalid_field(&self) -> Option<&'static str> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        fields
            .into_iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
            .map(|(name, _)| name)
    }
}

/// Chronologically ascending bars for a single symbol.
///
/// The bars are private so a series can only be built through [`PriceSeries::new`],
/// which enforces finite, non-negative values and strictly increasing timestamps.
/// Indicator values never live here; see [`crate::models::IndicatorFrame`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if let Some(field) = bar.invalid_field() {
                return Err(SeriesError::InvalidValue { index, field });
            }
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(SeriesError::OutOfOrder {
                    index,
                    timestamp: bar.timestamp,
                });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Bar immediately before the latest one
    pub fn prior(&self) -> Option<&PriceBar> {
        self.bars.len().checked_sub(2).map(|i| &self.bars[i])
    }

    /// Bar `periods` positions before the latest one, falling back to the prior bar
    /// when the series is too short.
    pub fn periods_back_or_prior(&self, periods: usize) -> Option<&PriceBar> {
        match self.bars.len().checked_sub(periods + 1) {
            Some(i) => self.bars.get(i),
            None => self.prior(),
        }
    }
}
