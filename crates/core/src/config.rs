//! Configuration structures for the gold feature pipeline.
//!
//! Defaults reproduce the indicator windows the downstream decision model
//! was trained on, so the default column names are stable.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the feature builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Moving average configuration.
    pub trend: TrendConfig,
    /// Momentum oscillator configuration.
    pub momentum: MomentumConfig,
    /// Volatility configuration.
    pub volatility: VolatilityConfig,
    /// Volume configuration.
    pub volume: VolumeConfig,
}

impl FeatureConfig {
    /// Parse a configuration from a JSON string.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FeatureConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Check that every window is usable.
    pub fn validate(&self) -> Result<()> {
        self.trend.validate()?;
        self.momentum.validate()?;
        self.volatility.validate()?;
        self.volume.validate()
    }
}

fn check_windows(field: &str, windows: &[usize]) -> Result<()> {
    if windows.iter().any(|&w| w == 0) {
        return Err(Error::config(format!("{field} contains a zero window")));
    }
    Ok(())
}

fn check_window(field: &str, window: usize) -> Result<()> {
    if window == 0 {
        return Err(Error::config(format!("{field} must be positive")));
    }
    Ok(())
}

/// Moving average (trend) configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Simple moving average windows over Close.
    pub sma_windows: Vec<usize>,
    /// Exponential moving average windows over Close.
    pub ema_windows: Vec<usize>,
    /// (fast, slow) SMA pair for the cross signal.
    pub sma_cross: (usize, usize),
    /// (fast, slow) EMA pair for the cross signal.
    pub ema_cross: (usize, usize),
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            sma_windows: vec![5, 10, 20, 50, 100, 200],
            ema_windows: vec![9, 12, 21, 26, 50],
            sma_cross: (20, 50),
            ema_cross: (12, 26),
        }
    }
}

impl TrendConfig {
    fn validate(&self) -> Result<()> {
        check_windows("trend.sma_windows", &self.sma_windows)?;
        check_windows("trend.ema_windows", &self.ema_windows)?;

        let (fast, slow) = self.sma_cross;
        if !self.sma_windows.contains(&fast) || !self.sma_windows.contains(&slow) {
            return Err(Error::config(format!(
                "trend.sma_cross ({fast}, {slow}) must use configured SMA windows"
            )));
        }
        let (fast, slow) = self.ema_cross;
        if !self.ema_windows.contains(&fast) || !self.ema_windows.contains(&slow) {
            return Err(Error::config(format!(
                "trend.ema_cross ({fast}, {slow}) must use configured EMA windows"
            )));
        }
        Ok(())
    }
}

/// Momentum oscillator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// RSI windows.
    pub rsi_windows: Vec<usize>,
    /// Stochastic %K lookback.
    pub stoch_window: usize,
    /// Stochastic %D smoothing.
    pub stoch_smooth_window: usize,
    /// MACD fast EMA span.
    pub macd_fast: usize,
    /// MACD slow EMA span.
    pub macd_slow: usize,
    /// MACD signal EMA span.
    pub macd_signal: usize,
    /// Rate-of-change lookbacks.
    pub roc_windows: Vec<usize>,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            rsi_windows: vec![14, 21],
            stoch_window: 14,
            stoch_smooth_window: 3,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            roc_windows: vec![10, 20],
        }
    }
}

impl MomentumConfig {
    fn validate(&self) -> Result<()> {
        check_windows("momentum.rsi_windows", &self.rsi_windows)?;
        check_windows("momentum.roc_windows", &self.roc_windows)?;
        check_window("momentum.stoch_window", self.stoch_window)?;
        check_window("momentum.stoch_smooth_window", self.stoch_smooth_window)?;
        check_window("momentum.macd_fast", self.macd_fast)?;
        check_window("momentum.macd_signal", self.macd_signal)?;
        if self.macd_fast >= self.macd_slow {
            return Err(Error::config(format!(
                "momentum.macd_fast ({}) must be below macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        Ok(())
    }
}

/// Volatility configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityConfig {
    /// Average True Range windows.
    pub atr_windows: Vec<usize>,
    /// Bollinger Band window.
    pub bb_window: usize,
    /// Bollinger Band width in standard deviations.
    pub bb_dev: f64,
    /// Historical volatility windows (std of percentage returns).
    pub hist_vol_windows: Vec<usize>,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            atr_windows: vec![14, 20],
            bb_window: 20,
            bb_dev: 2.0,
            hist_vol_windows: vec![10, 20, 30],
        }
    }
}

impl VolatilityConfig {
    fn validate(&self) -> Result<()> {
        check_windows("volatility.atr_windows", &self.atr_windows)?;
        check_windows("volatility.hist_vol_windows", &self.hist_vol_windows)?;
        check_window("volatility.bb_window", self.bb_window)?;
        if self.bb_dev.is_nan() || self.bb_dev <= 0.0 {
            return Err(Error::config("volatility.bb_dev must be positive"));
        }
        Ok(())
    }
}

/// Volume indicator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Volume simple moving average windows.
    pub sma_windows: Vec<usize>,
    /// Volume SMA window used as the ratio denominator.
    pub ratio_window: usize,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            sma_windows: vec![10, 20],
            ratio_window: 20,
        }
    }
}

impl VolumeConfig {
    fn validate(&self) -> Result<()> {
        check_windows("volume.sma_windows", &self.sma_windows)?;
        if !self.sma_windows.contains(&self.ratio_window) {
            return Err(Error::config(format!(
                "volume.ratio_window ({}) must be one of volume.sma_windows",
                self.ratio_window
            )));
        }
        Ok(())
    }
}
