//! RSI (Relative Strength Index) indicator

use crate::common::math;

pub const RSI_PERIOD: usize = 14;

/// Calculate the RSI series over closing prices using Wilder's smoothing.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss
///
/// The window is `period` closes; the change into the first close counts as zero. The first
/// value (index `period - 1`) is seeded from the plain mean of the window's gains and losses,
/// later values follow `avg = (prev * (period - 1) + current) / period`.
pub fn calculate_rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return result;
    }

    let changes: Vec<f64> = std::iter::once(0.0)
        .chain(closes.windows(2).map(|w| w[1] - w[0]))
        .collect();

    let seed = &changes[..period];
    let mut avg_gain = seed.iter().map(|c| gain(*c)).sum::<f64>() / period as f64;
    let mut avg_loss = seed.iter().map(|c| loss(*c)).sum::<f64>() / period as f64;
    result[period - 1] = Some(rsi_from_averages(avg_gain, avg_loss));

    for i in period..closes.len() {
        avg_gain = math::wilder_step(avg_gain, gain(changes[i]), period);
        avg_loss = math::wilder_step(avg_loss, loss(changes[i]), period);
        result[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Calculate the RSI series with the default period (14)
pub fn calculate_rsi_series_default(closes: &[f64]) -> Vec<Option<f64>> {
    calculate_rsi_series(closes, RSI_PERIOD)
}

fn gain(change: f64) -> f64 {
    if change > 0.0 {
        change
    } else {
        0.0
    }
}

fn loss(change: f64) -> f64 {
    if change < 0.0 {
        -change
    } else {
        0.0
    }
}

/// RSI from smoothed averages. Flat input (no gains, no losses) reads as neutral 50.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}
