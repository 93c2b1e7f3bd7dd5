//! Window arithmetic over plain `f64` slices

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of the `period` values ending at each index; the first `period - 1` entries are `None`.
///
/// Each window is summed from scratch so a value never depends on rounding carried over from
/// earlier windows.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                mean(&values[i + 1 - period..=i])
            }
        })
        .collect()
}

/// Like [`rolling_mean`] but averages over whatever is available before the window fills
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(&values[start..=i]).unwrap_or(0.0)
        })
        .collect()
}

/// One step of Wilder's recursive average
pub fn wilder_step(previous: f64, current: f64, period: usize) -> f64 {
    let period = period as f64;
    (previous * (period - 1.0) + current) / period
}

/// Percent change from `reference` to `current`; zero when the reference is zero
pub fn percent_change(current: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (current / reference - 1.0) * 100.0
}
