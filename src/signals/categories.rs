//! Rule thresholds per signal category

/// RSI below this reads as oversold
pub const RSI_OVERSOLD: f64 = 30.0;

/// RSI above this reads as overbought
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Volume above this multiple of its 20-bar average is a spike
pub const VOLUME_SPIKE_RATIO: f64 = 1.5;
