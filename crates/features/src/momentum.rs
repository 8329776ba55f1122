//! Momentum oscillators: RSI, stochastic, MACD and rate of change.

use crate::rolling;

/// Relative Strength Index with Wilder smoothing.
///
/// Gains and losses are smoothed with `alpha = 1 / window`. RSI is 100 when
/// the average loss is zero.
pub fn rsi(close: &[f64], window: usize) -> Vec<f64> {
    let moves = rolling::diff(close);
    let gains: Vec<f64> = moves.iter().map(|&d| if d > 0.0 { d } else { 0.0 }).collect();
    let losses: Vec<f64> = moves.iter().map(|&d| if d < 0.0 { -d } else { 0.0 }).collect();

    let alpha = 1.0 / window as f64;
    let avg_gain = rolling::ewm_mean(&gains, alpha, window);
    let avg_loss = rolling::ewm_mean(&losses, alpha, window);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&gain, &loss)| {
            if loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + gain / loss)
            }
        })
        .collect()
}

/// Stochastic oscillator output.
#[derive(Debug, Clone)]
pub struct Stochastic {
    /// %K: close position within the high/low range, 0-100.
    pub k: Vec<f64>,
    /// %D: moving average of %K.
    pub d: Vec<f64>,
}

/// Stochastic oscillator.
///
/// A flat high/low range divides by zero and yields NaN or infinity.
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    window: usize,
    smooth_window: usize,
) -> Stochastic {
    let lowest = rolling::rolling_min(low, window);
    let highest = rolling::rolling_max(high, window);

    let k: Vec<f64> = close
        .iter()
        .zip(lowest.iter().zip(&highest))
        .map(|(&c, (&lo, &hi))| 100.0 * (c - lo) / (hi - lo))
        .collect();
    let d = rolling::rolling_mean(&k, smooth_window);

    Stochastic { k, d }
}

/// MACD output.
#[derive(Debug, Clone)]
pub struct Macd {
    /// Fast EMA minus slow EMA.
    pub macd: Vec<f64>,
    /// EMA of the MACD line.
    pub signal: Vec<f64>,
    /// MACD minus signal (histogram).
    pub diff: Vec<f64>,
}

/// Moving Average Convergence Divergence.
pub fn macd(close: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let ema_fast = rolling::ema(close, fast);
    let ema_slow = rolling::ema(close, slow);

    let line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
    let signal_line = rolling::ema(&line, signal);
    let diff = line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

    Macd {
        macd: line,
        signal: signal_line,
        diff,
    }
}

/// Rate of change in percent over `window` rows.
pub fn roc(close: &[f64], window: usize) -> Vec<f64> {
    close
        .iter()
        .zip(rolling::shift(close, window))
        .map(|(&cur, past)| (cur - past) / past * 100.0)
        .collect()
}
