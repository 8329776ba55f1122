//! Volume indicators.

use crate::rolling;

/// On-Balance Volume.
///
/// Starts at the first row's volume, then subtracts volume on a down close,
/// carries the total on a tie and adds it otherwise. A close that cannot be
/// compared with the previous one (either is NaN) counts as up. A NaN volume
/// leaves the running total untouched and reports NaN for that row.
pub fn on_balance_volume(close: &[f64], volume: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(close.len());
    let mut total = 0.0;

    for (i, (&c, &v)) in close.iter().zip(volume).enumerate() {
        if v.is_nan() {
            out.push(f64::NAN);
            continue;
        }

        if i == 0 {
            total += v;
        } else {
            let prev = close[i - 1];
            if c < prev {
                total -= v;
            } else if c != prev {
                total += v;
            }
        }
        out.push(total);
    }
    out
}

/// Simple moving average of volume.
pub fn volume_sma(volume: &[f64], window: usize) -> Vec<f64> {
    rolling::rolling_mean(volume, window)
}

/// Current volume relative to its moving average.
pub fn volume_ratio(volume: &[f64], volume_sma: &[f64]) -> Vec<f64> {
    volume.iter().zip(volume_sma).map(|(v, avg)| v / avg).collect()
}
