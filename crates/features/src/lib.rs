//! Technical-analysis feature computation for the gold trading pipeline.
//!
//! This crate handles:
//! - Rolling-window and exponential smoothing primitives
//! - Trend features (SMA, EMA, crossovers)
//! - Momentum oscillators (RSI, stochastic, MACD, rate of change)
//! - Volatility measures (ATR, Bollinger Bands, historical volatility)
//! - Volume indicators (OBV, volume averages, volume ratio)

pub mod rolling;
pub mod trend;
pub mod momentum;
pub mod volatility;
pub mod volume;
pub mod builder;

pub use momentum::{Macd, Stochastic};
pub use volatility::BollingerBands;
pub use builder::GoldFeatureBuilder;
