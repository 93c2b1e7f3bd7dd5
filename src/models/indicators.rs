use serde::{Deserialize, Serialize};

/// Indicator values at a single bar index.
///
/// `None` means the indicator does not have enough history yet at this index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi14: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma20: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma50: Option<f64>,
    /// Mean volume over the trailing 20 bars, or fewer at the start of the series
    pub volume_avg20: f64,
}

/// Indicator columns aligned index-for-index with a [`crate::models::PriceSeries`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub rsi14: Vec<Option<f64>>,
    pub sma20: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
    pub volume_avg20: Vec<f64>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.rsi14.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi14.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<IndicatorPoint> {
        Some(IndicatorPoint {
            rsi14: *self.rsi14.get(index)?,
            sma20: *self.sma20.get(index)?,
            sma50: *self.sma50.get(index)?,
            volume_avg20: *self.volume_avg20.get(index)?,
        })
    }

    pub fn latest(&self) -> Option<IndicatorPoint> {
        self.len().checked_sub(1).and_then(|i| self.point(i))
    }
}
