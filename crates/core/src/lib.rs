//! Core types and configuration for the gold feature pipeline.
//!
//! This crate provides shared types used by the feature builder:
//! - OHLCV bars and the columnar observation table
//! - Configuration structures (indicator windows)
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::FeatureConfig;
pub use error::{Error, Result};
pub use types::*;
