//! Indicator computation over a whole price series

use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::rsi;
use crate::indicators::trend::sma;
use crate::indicators::volume;
use crate::models::{IndicatorFrame, PriceSeries};

/// Shortest series the engine accepts (the SMA(50) lookback)
pub const MIN_HISTORY: usize = sma::SMA_SLOW_PERIOD;

pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Compute RSI(14), SMA(20), SMA(50) and the 20-bar volume average for every bar.
    ///
    /// The frame has exactly one entry per bar. Series shorter than [`MIN_HISTORY`] are
    /// rejected without computing anything.
    pub fn compute(series: &PriceSeries) -> Result<IndicatorFrame, IndicatorError> {
        if series.len() < MIN_HISTORY {
            return Err(IndicatorError::InsufficientHistory {
                required: MIN_HISTORY,
                actual: series.len(),
            });
        }

        let closes = series.closes();
        let volumes = series.volumes();

        Ok(IndicatorFrame {
            rsi14: rsi::calculate_rsi_series_default(&closes),
            sma20: sma::calculate_sma_series(&closes, sma::SMA_FAST_PERIOD),
            sma50: sma::calculate_sma_series(&closes, sma::SMA_SLOW_PERIOD),
            volume_avg20: volume::calculate_volume_average(
                &volumes,
                volume::VOLUME_AVERAGE_WINDOW,
            ),
        })
    }
}
