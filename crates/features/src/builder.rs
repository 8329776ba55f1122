//! Feature builder.
//!
//! Owns a copy of the observation table and appends indicator columns to it
//! in four independent passes.

use crate::{momentum, trend, volatility, volume};
use gold_core::{Error, FeatureConfig, PriceFrame, Result};
use tracing::{debug, info};

/// Builds technical-analysis feature columns on top of an OHLCV table.
///
/// Passes may run in any order and may be re-run; a re-run overwrites the
/// columns it produced before. Insufficient history shows up as NaN, never
/// as an error.
pub struct GoldFeatureBuilder {
    /// Working copy of the observation table.
    frame: PriceFrame,
    /// Indicator windows.
    config: FeatureConfig,
    /// Names of created feature columns, in creation order.
    features_created: Vec<String>,
}

impl GoldFeatureBuilder {
    /// Create a builder with the default indicator windows.
    ///
    /// The table is copied; the caller's frame is never modified.
    pub fn new(frame: &PriceFrame) -> Self {
        Self {
            frame: frame.clone(),
            config: FeatureConfig::default(),
            features_created: Vec::new(),
        }
    }

    /// Create a builder with custom indicator windows.
    pub fn with_config(frame: &PriceFrame, config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            frame: frame.clone(),
            config,
            features_created: Vec::new(),
        })
    }

    /// The enriched table.
    pub fn frame(&self) -> &PriceFrame {
        &self.frame
    }

    /// Consume the builder and return the enriched table.
    pub fn into_frame(self) -> PriceFrame {
        self.frame
    }

    /// Feature names created so far, in creation order.
    pub fn features_created(&self) -> &[String] {
        &self.features_created
    }

    /// Look up a feature column.
    pub fn feature(&self, name: &str) -> Option<&[f64]> {
        self.frame.feature(name)
    }

    /// Indicator windows in use.
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Run every pass: trend, momentum, volatility, then volume.
    pub fn add_all_features(&mut self) -> Result<()> {
        self.add_moving_averages()?;
        self.add_momentum_indicators()?;
        self.add_volatility_indicators()?;
        self.add_volume_indicators()?;
        info!(
            rows = self.frame.len(),
            features = self.features_created.len(),
            "Feature set complete"
        );
        Ok(())
    }

    /// Store a column and record its name.
    fn add_feature(&mut self, name: String, values: Vec<f64>) -> Result<()> {
        self.frame.insert_feature(name.as_str(), values)?;
        debug!(feature = %name, "Added feature column");
        if !self.features_created.contains(&name) {
            self.features_created.push(name);
        }
        Ok(())
    }

    fn require_feature(&self, name: &str) -> Result<Vec<f64>> {
        self.frame
            .feature(name)
            .map(<[f64]>::to_vec)
            .ok_or_else(|| Error::missing_column(name))
    }

    /// Simple and exponential moving averages of Close, plus the SMA and EMA
    /// crossover signals.
    pub fn add_moving_averages(&mut self) -> Result<()> {
        info!("Adding moving averages");
        let cfg = self.config.trend.clone();
        let close = self.frame.close().to_vec();

        for &window in &cfg.sma_windows {
            self.add_feature(format!("SMA_{window}"), trend::sma(&close, window))?;
        }
        for &window in &cfg.ema_windows {
            self.add_feature(format!("EMA_{window}"), trend::ema(&close, window))?;
        }

        let (fast, slow) = cfg.sma_cross;
        let signal = trend::cross_signal(
            &self.require_feature(&format!("SMA_{fast}"))?,
            &self.require_feature(&format!("SMA_{slow}"))?,
        );
        self.add_feature(format!("SMA_Cross_{fast}_{slow}"), signal)?;

        let (fast, slow) = cfg.ema_cross;
        let signal = trend::cross_signal(
            &self.require_feature(&format!("EMA_{fast}"))?,
            &self.require_feature(&format!("EMA_{slow}"))?,
        );
        self.add_feature(format!("EMA_Cross_{fast}_{slow}"), signal)?;

        let added = cfg.sma_windows.len() + cfg.ema_windows.len() + 2;
        info!(added, "Moving averages added");
        Ok(())
    }

    /// RSI, stochastic oscillator, MACD and rate of change.
    pub fn add_momentum_indicators(&mut self) -> Result<()> {
        info!("Adding momentum indicators");
        let cfg = self.config.momentum.clone();
        let close = self.frame.close().to_vec();

        for &window in &cfg.rsi_windows {
            self.add_feature(format!("RSI_{window}"), momentum::rsi(&close, window))?;
        }

        let stoch = momentum::stochastic(
            self.frame.high(),
            self.frame.low(),
            &close,
            cfg.stoch_window,
            cfg.stoch_smooth_window,
        );
        self.add_feature("Stoch_K".to_string(), stoch.k)?;
        self.add_feature("Stoch_D".to_string(), stoch.d)?;

        let macd = momentum::macd(&close, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal);
        self.add_feature("MACD".to_string(), macd.macd)?;
        self.add_feature("MACD_Signal".to_string(), macd.signal)?;
        self.add_feature("MACD_Diff".to_string(), macd.diff)?;

        for &window in &cfg.roc_windows {
            self.add_feature(format!("ROC_{window}"), momentum::roc(&close, window))?;
        }

        let added = cfg.rsi_windows.len() + 2 + 3 + cfg.roc_windows.len();
        info!(added, "Momentum indicators added");
        Ok(())
    }

    /// ATR, Bollinger Bands and historical volatility.
    pub fn add_volatility_indicators(&mut self) -> Result<()> {
        info!("Adding volatility indicators");
        let cfg = self.config.volatility.clone();
        let close = self.frame.close().to_vec();

        for &window in &cfg.atr_windows {
            let atr = volatility::average_true_range(
                self.frame.high(),
                self.frame.low(),
                &close,
                window,
            );
            self.add_feature(format!("ATR_{window}"), atr)?;
        }

        let bb = volatility::bollinger(&close, cfg.bb_window, cfg.bb_dev);
        self.add_feature("BB_High".to_string(), bb.upper)?;
        self.add_feature("BB_Mid".to_string(), bb.middle)?;
        self.add_feature("BB_Low".to_string(), bb.lower)?;
        self.add_feature("BB_Width".to_string(), bb.width)?;
        self.add_feature("BB_Pct".to_string(), bb.percent_b)?;

        for &window in &cfg.hist_vol_windows {
            let hv = volatility::historical_volatility(&close, window);
            self.add_feature(format!("Volatility_{window}"), hv)?;
        }

        let added = cfg.atr_windows.len() + 5 + cfg.hist_vol_windows.len();
        info!(added, "Volatility indicators added");
        Ok(())
    }

    /// On-Balance Volume, volume moving averages and the volume ratio.
    ///
    /// Does nothing when the table has no volume column.
    pub fn add_volume_indicators(&mut self) -> Result<()> {
        let Some(vol) = self.frame.volume().map(<[f64]>::to_vec) else {
            info!("No volume data, skipping volume indicators");
            return Ok(());
        };

        info!("Adding volume indicators");
        let cfg = self.config.volume.clone();

        let obv = volume::on_balance_volume(self.frame.close(), &vol);
        self.add_feature("OBV".to_string(), obv)?;

        for &window in &cfg.sma_windows {
            self.add_feature(format!("Volume_SMA_{window}"), volume::volume_sma(&vol, window))?;
        }

        let avg = self.require_feature(&format!("Volume_SMA_{}", cfg.ratio_window))?;
        self.add_feature("Volume_Ratio".to_string(), volume::volume_ratio(&vol, &avg))?;

        let added = 1 + cfg.sma_windows.len() + 1;
        info!(added, "Volume indicators added");
        Ok(())
    }
}
