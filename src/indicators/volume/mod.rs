//! Volume indicators

use crate::common::math;

pub const VOLUME_AVERAGE_WINDOW: usize = 20;

/// Trailing mean volume. Early bars average over the bars available so far.
pub fn calculate_volume_average(volumes: &[f64], window: usize) -> Vec<f64> {
    math::trailing_mean(volumes, window)
}

/// Latest volume relative to its trailing average, `None` when the average is zero
pub fn volume_ratio(volume: f64, average: f64) -> Option<f64> {
    if average > 0.0 {
        Some(volume / average)
    } else {
        None
    }
}
