//! Moving averages and crossover signals.

use crate::rolling;

/// Simple moving average.
pub fn sma(close: &[f64], window: usize) -> Vec<f64> {
    rolling::rolling_mean(close, window)
}

/// Exponential moving average, undefined for the first `window - 1` rows.
pub fn ema(close: &[f64], window: usize) -> Vec<f64> {
    rolling::ema(close, window)
}

/// Binary crossover state: 1.0 where `fast > slow`, else 0.0.
///
/// Rows where either side is NaN compare false and yield 0.0.
pub fn cross_signal(fast: &[f64], slow: &[f64]) -> Vec<f64> {
    fast.iter()
        .zip(slow)
        .map(|(f, s)| if f > s { 1.0 } else { 0.0 })
        .collect()
}
