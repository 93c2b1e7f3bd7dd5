//! SMA (Simple Moving Average) indicator

use crate::common::math;

pub const SMA_FAST_PERIOD: usize = 20;
pub const SMA_SLOW_PERIOD: usize = 50;

/// Calculate the SMA series for a specific period.
///
/// Each value is the mean of the trailing `period` closes; the first `period - 1` are `None`.
pub fn calculate_sma_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    math::rolling_mean(closes, period)
}
