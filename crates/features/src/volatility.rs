//! Volatility measures: ATR, Bollinger Bands and historical volatility.

use crate::rolling;

/// True range per row.
///
/// Maximum of `high - low`, `|high - prev_close|` and `|low - prev_close|`,
/// ignoring undefined terms. The first row has no previous close, so it is
/// just `high - low`.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let prev_close = rolling::shift(close, 1);

    high.iter()
        .zip(low)
        .zip(prev_close)
        .map(|((&h, &l), pc)| {
            [h - l, (h - pc).abs(), (l - pc).abs()]
                .into_iter()
                .filter(|v| !v.is_nan())
                .fold(f64::NAN, f64::max)
        })
        .collect()
}

/// Average True Range with Wilder smoothing.
///
/// The first defined row (`window - 1`) is the mean of the first `window`
/// true ranges; each later row is `(atr[i-1] * (window - 1) + tr[i]) / window`.
pub fn average_true_range(high: &[f64], low: &[f64], close: &[f64], window: usize) -> Vec<f64> {
    let tr = true_range(high, low, close);
    let mut atr = vec![f64::NAN; tr.len()];
    if window == 0 || tr.len() < window {
        return atr;
    }

    let w = window as f64;
    atr[window - 1] = tr[..window].iter().sum::<f64>() / w;
    for i in window..tr.len() {
        atr[i] = (atr[i - 1] * (w - 1.0) + tr[i]) / w;
    }
    atr
}

/// Bollinger Bands output.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    /// Middle band plus `k` standard deviations.
    pub upper: Vec<f64>,
    /// Simple moving average of close.
    pub middle: Vec<f64>,
    /// Middle band minus `k` standard deviations.
    pub lower: Vec<f64>,
    /// Band width relative to the middle band, in percent.
    pub width: Vec<f64>,
    /// Position of close within the bands (0 = lower, 1 = upper).
    pub percent_b: Vec<f64>,
}

/// Bollinger Bands using the population standard deviation of close.
pub fn bollinger(close: &[f64], window: usize, num_std: f64) -> BollingerBands {
    let middle = rolling::rolling_mean(close, window);
    let std = rolling::rolling_population_std(close, window);

    let upper: Vec<f64> = middle.iter().zip(&std).map(|(m, s)| m + num_std * s).collect();
    let lower: Vec<f64> = middle.iter().zip(&std).map(|(m, s)| m - num_std * s).collect();

    let mut width = Vec::with_capacity(close.len());
    let mut percent_b = Vec::with_capacity(close.len());
    for i in 0..close.len() {
        let band = upper[i] - lower[i];
        width.push(band / middle[i] * 100.0);
        percent_b.push((close[i] - lower[i]) / band);
    }

    BollingerBands {
        upper,
        middle,
        lower,
        width,
        percent_b,
    }
}

/// Historical volatility: rolling sample std of percentage returns, scaled
/// by `sqrt(window)`.
pub fn historical_volatility(close: &[f64], window: usize) -> Vec<f64> {
    let returns = rolling::pct_change(close);
    let scale = (window as f64).sqrt();

    rolling::rolling_std(&returns, window)
        .into_iter()
        .map(|s| s * scale)
        .collect()
}
