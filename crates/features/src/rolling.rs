//! Rolling-window and exponential smoothing primitives.
//!
//! Every function maps a series to a series of the same length. Rows without
//! enough history are NaN, and a NaN inside a window makes that window NaN.

use statrs::statistics::Statistics;

/// Apply `f` to every full window ending at each row.
fn rolling_apply<F>(values: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || window > values.len() {
        return out;
    }

    for end in window..=values.len() {
        let slice = &values[end - window..end];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[end - 1] = f(slice);
    }
    out
}

/// Rolling arithmetic mean.
///
/// Keeps a running sum of the finite values in the window. Windows holding
/// an infinite value are summed directly so the running sum is never
/// poisoned by `inf - inf`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || window > values.len() {
        return out;
    }

    let mut sum = 0.0;
    let mut nan_count = 0usize;
    let mut inf_count = 0usize;

    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            nan_count += 1;
        } else if v.is_infinite() {
            inf_count += 1;
        } else {
            sum += v;
        }

        // Drop the value leaving the window
        if i >= window {
            let old = values[i - window];
            if old.is_nan() {
                nan_count -= 1;
            } else if old.is_infinite() {
                inf_count -= 1;
            } else {
                sum -= old;
            }
        }

        if i + 1 < window || nan_count > 0 {
            continue;
        }
        out[i] = if inf_count > 0 {
            values[i + 1 - window..=i].iter().sum::<f64>() / window as f64
        } else {
            sum / window as f64
        };
    }
    out
}

/// Rolling sample standard deviation (n - 1 denominator).
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| w.iter().std_dev())
}

/// Rolling population standard deviation (n denominator).
pub fn rolling_population_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| w.iter().population_std_dev())
}

/// Rolling minimum.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| Statistics::min(w.iter()))
}

/// Rolling maximum.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| Statistics::max(w.iter()))
}

/// Exponentially weighted mean with recursive (non-adjusted) weights.
///
/// `y[t] = (1 - alpha) * y[t-1] + alpha * x[t]`, seeded with the first
/// non-NaN value. A NaN input still decays the weight of the running mean,
/// so the next observation gets more influence. Output is NaN until
/// `min_periods` observations have been seen.
pub fn ewm_mean(values: &[f64], alpha: f64, min_periods: usize) -> Vec<f64> {
    let min_periods = min_periods.max(1);
    let mut out = Vec::with_capacity(values.len());

    let mut weighted = f64::NAN;
    let mut old_wt = 1.0;
    let mut nobs = 0usize;

    for &x in values {
        let is_obs = !x.is_nan();
        if is_obs {
            nobs += 1;
        }

        if !weighted.is_nan() {
            old_wt *= 1.0 - alpha;
            if is_obs {
                if weighted != x {
                    weighted = (old_wt * weighted + alpha * x) / (old_wt + alpha);
                }
                old_wt = 1.0;
            }
        } else if is_obs {
            weighted = x;
        }

        out.push(if nobs >= min_periods { weighted } else { f64::NAN });
    }
    out
}

/// Exponential moving average with span-derived smoothing.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    ewm_mean(values, alpha, span)
}

/// Lag a series by `n` rows, filling the head with NaN.
pub fn shift(values: &[f64], n: usize) -> Vec<f64> {
    let n = n.min(values.len());
    let mut out = vec![f64::NAN; n];
    out.extend_from_slice(&values[..values.len() - n]);
    out
}

/// First difference: `x[t] - x[t-1]`.
pub fn diff(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .zip(shift(values, 1))
        .map(|(&cur, prev)| cur - prev)
        .collect()
}

/// Carry the last defined value forward over NaN rows.
///
/// Leading NaNs stay NaN.
pub fn forward_fill(values: &[f64]) -> Vec<f64> {
    let mut last = f64::NAN;
    values
        .iter()
        .map(|&v| {
            if !v.is_nan() {
                last = v;
            }
            last
        })
        .collect()
}

/// Fractional change: `x[t] / x[t-1] - 1`.
///
/// Gaps are forward-filled first, so a NaN row reports a zero change and the
/// row after it is measured against the last defined value.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let filled = forward_fill(values);
    filled
        .iter()
        .zip(shift(&filled, 1))
        .map(|(&cur, prev)| cur / prev - 1.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rolling_mean_warmup() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        let m = rolling_mean(&v, 3);

        assert!(m[0].is_nan());
        assert!(m[1].is_nan());
        assert_relative_eq!(m[2], 2.0);
        assert_relative_eq!(m[4], 4.0);
    }

    #[test]
    fn test_running_mean_matches_window_mean() {
        let v: Vec<f64> = (0..500)
            .map(|i| 1900.0 + (i as f64 * 0.31).sin() * 40.0 + i as f64 * 0.05)
            .collect();
        let m = rolling_mean(&v, 200);

        assert!(m[198].is_nan());
        for i in 199..v.len() {
            let direct = v[i - 199..=i].iter().sum::<f64>() / 200.0;
            assert_relative_eq!(m[i], direct, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mean_recovers_after_infinite_value() {
        let v = [1.0, f64::INFINITY, 3.0, 5.0, 7.0];
        let m = rolling_mean(&v, 2);

        assert_eq!(m[1], f64::INFINITY);
        assert_eq!(m[2], f64::INFINITY);
        assert_relative_eq!(m[3], 4.0);
        assert_relative_eq!(m[4], 6.0);
    }

    #[test]
    fn test_window_longer_than_series() {
        let m = rolling_mean(&[1.0, 2.0], 5);
        assert_eq!(m.len(), 2);
        assert!(m.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_nan_poisons_window() {
        let v = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let m = rolling_mean(&v, 2);

        assert!(m[1].is_nan());
        assert!(m[2].is_nan());
        assert_relative_eq!(m[3], 3.5);
    }

    #[test]
    fn test_std_denominators() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sample = rolling_std(&v, 8);
        let population = rolling_population_std(&v, 8);

        // Classic textbook series: population std is exactly 2
        assert_relative_eq!(population[7], 2.0, epsilon = 1e-12);
        assert_relative_eq!(sample[7], (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_min_max() {
        let v = [3.0, 1.0, 4.0, 1.0, 5.0];
        let lo = rolling_min(&v, 3);
        let hi = rolling_max(&v, 3);

        assert_eq!(lo[2], 1.0);
        assert_eq!(hi[2], 4.0);
        assert_eq!(hi[4], 5.0);
    }

    #[test]
    fn test_ewm_recursion() {
        let v = [10.0, 20.0, 30.0];
        let out = ewm_mean(&v, 0.5, 1);

        assert_relative_eq!(out[0], 10.0);
        assert_relative_eq!(out[1], 15.0);
        assert_relative_eq!(out[2], 22.5);
    }

    #[test]
    fn test_ewm_min_periods() {
        let v = [1.0, 2.0, 3.0, 4.0];
        let out = ema(&v, 3);

        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        // alpha = 0.5, seeded at the first value
        assert_relative_eq!(out[2], 2.25);
        assert_relative_eq!(out[3], 3.125);
    }

    #[test]
    fn test_ewm_leading_nan_seeds_at_first_value() {
        let v = [f64::NAN, f64::NAN, 4.0, 8.0];
        let out = ewm_mean(&v, 0.5, 2);

        assert!(out[2].is_nan());
        assert_relative_eq!(out[3], 6.0);
    }

    #[test]
    fn test_ewm_interior_nan_decays_weight() {
        let v = [0.0, f64::NAN, 10.0];
        let out = ewm_mean(&v, 0.5, 1);

        // Running mean held across the gap
        assert_relative_eq!(out[1], 0.0);
        // old weight decays twice: (0.25 * 0 + 0.5 * 10) / 0.75
        assert_relative_eq!(out[2], 10.0 * 0.5 / 0.75);
    }

    #[test]
    fn test_shift_and_diff() {
        let v = [1.0, 3.0, 6.0];
        let s = shift(&v, 1);
        assert!(s[0].is_nan());
        assert_eq!(&s[1..], &[1.0, 3.0]);

        let d = diff(&v);
        assert!(d[0].is_nan());
        assert_eq!(&d[1..], &[2.0, 3.0]);

        assert!(shift(&v, 10).iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_pct_change() {
        let r = pct_change(&[100.0, 110.0, 99.0]);
        assert!(r[0].is_nan());
        assert_relative_eq!(r[1], 0.10, epsilon = 1e-12);
        assert_relative_eq!(r[2], -0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_pct_change_fills_gaps() {
        let r = pct_change(&[f64::NAN, 100.0, f64::NAN, 120.0]);

        assert!(r[0].is_nan());
        assert!(r[1].is_nan());
        // Gap row repeats the last close
        assert_relative_eq!(r[2], 0.0);
        // Measured against the last defined close
        assert_relative_eq!(r[3], 0.20, epsilon = 1e-12);
    }

    #[test]
    fn test_forward_fill() {
        let f = forward_fill(&[f64::NAN, 1.0, f64::NAN, f64::NAN, 4.0]);
        assert!(f[0].is_nan());
        assert_eq!(&f[1..], &[1.0, 1.0, 1.0, 4.0]);
    }
}
