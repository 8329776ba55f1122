//! Core data types for the gold feature pipeline.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Timestamp type of the table index.
pub type Timestamp = DateTime<Utc>;

/// Name of the open price column.
pub const OPEN: &str = "Open";
/// Name of the high price column.
pub const HIGH: &str = "High";
/// Name of the low price column.
pub const LOW: &str = "Low";
/// Name of the close price column.
pub const CLOSE: &str = "Close";
/// Name of the optional volume column.
pub const VOLUME: &str = "Volume";

/// A single OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Period timestamp.
    pub ts: Timestamp,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Traded volume, if the source provides it.
    pub volume: Option<f64>,
}

/// A derived numeric series aligned with the table index.
#[derive(Debug, Clone)]
pub struct FeatureColumn {
    /// Column name (e.g. "SMA_20").
    pub name: String,
    /// One value per row; NaN where the lookback is insufficient.
    pub values: Vec<f64>,
}

/// Columnar observation table.
///
/// Holds the fixed price columns plus feature columns in insertion order.
/// Every column has exactly one value per index entry.
#[derive(Debug, Clone)]
pub struct PriceFrame {
    index: Vec<Timestamp>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Option<Vec<f64>>,
    features: Vec<FeatureColumn>,
}

impl PriceFrame {
    /// Create a table from its columns.
    ///
    /// Fails if a column does not match the index length or the index is
    /// not strictly ascending.
    pub fn new(
        index: Vec<Timestamp>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Option<Vec<f64>>,
    ) -> Result<Self> {
        let n = index.len();
        for (name, len) in [
            (OPEN, open.len()),
            (HIGH, high.len()),
            (LOW, low.len()),
            (CLOSE, close.len()),
        ] {
            if len != n {
                return Err(Error::length_mismatch(name, n, len));
            }
        }
        if let Some(v) = &volume {
            if v.len() != n {
                return Err(Error::length_mismatch(VOLUME, n, v.len()));
            }
        }

        if let Some(pos) = index.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Error::data(format!(
                "index is not strictly ascending at row {}",
                pos + 1
            )));
        }

        Ok(Self {
            index,
            open,
            high,
            low,
            close,
            volume,
            features: Vec::new(),
        })
    }

    /// Build a table from rows.
    ///
    /// The volume column is kept only if every bar carries a volume.
    pub fn from_bars(bars: &[Bar]) -> Result<Self> {
        let index = bars.iter().map(|b| b.ts).collect();
        let open = bars.iter().map(|b| b.open).collect();
        let high = bars.iter().map(|b| b.high).collect();
        let low = bars.iter().map(|b| b.low).collect();
        let close = bars.iter().map(|b| b.close).collect();
        let volume = bars.iter().map(|b| b.volume).collect::<Option<Vec<f64>>>();

        Self::new(index, open, high, low, close, volume)
    }

    /// Build a table from named columns.
    ///
    /// `Open`, `High`, `Low` and `Close` are required; `Volume` is optional.
    /// Any other column is ignored.
    pub fn from_columns<I, S>(index: Vec<Timestamp>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut named: HashMap<String, Vec<f64>> = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();

        let mut take =
            |name: &str| named.remove(name).ok_or_else(|| Error::missing_column(name));
        let open = take(OPEN)?;
        let high = take(HIGH)?;
        let low = take(LOW)?;
        let close = take(CLOSE)?;
        let volume = named.remove(VOLUME);

        Self::new(index, open, high, low, close, volume)
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Row timestamps, strictly ascending.
    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    /// Open prices.
    pub fn open(&self) -> &[f64] {
        &self.open
    }

    /// High prices.
    pub fn high(&self) -> &[f64] {
        &self.high
    }

    /// Low prices.
    pub fn low(&self) -> &[f64] {
        &self.low
    }

    /// Close prices.
    pub fn close(&self) -> &[f64] {
        &self.close
    }

    /// Volume column, if present.
    pub fn volume(&self) -> Option<&[f64]> {
        self.volume.as_deref()
    }

    /// Check if the table has a volume column.
    pub fn has_volume(&self) -> bool {
        self.volume.is_some()
    }

    /// Look up a feature column by name.
    pub fn feature(&self, name: &str) -> Option<&[f64]> {
        self.features
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Look up any column (price or feature) by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        match name {
            OPEN => Some(&self.open),
            HIGH => Some(&self.high),
            LOW => Some(&self.low),
            CLOSE => Some(&self.close),
            VOLUME => self.volume(),
            _ => self.feature(name),
        }
    }

    /// Feature columns in insertion order.
    pub fn features(&self) -> &[FeatureColumn] {
        &self.features
    }

    /// Feature column names in insertion order.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|c| c.name.as_str())
    }

    /// Add a feature column, replacing any existing column of the same name
    /// in place.
    pub fn insert_feature(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(Error::length_mismatch(name, self.len(), values.len()));
        }

        match self.features.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.features.push(FeatureColumn { name, values }),
        }
        Ok(())
    }

    /// First row at which every feature column is defined.
    ///
    /// Rows before it belong to the indicator warm-up region.
    pub fn first_complete_row(&self) -> Option<usize> {
        (0..self.len()).find(|&row| self.features.iter().all(|c| !c.values[row].is_nan()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ts(day: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn make_bar(day: i64, close: f64, volume: Option<f64>) -> Bar {
        Bar {
            ts: ts(day),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume,
        }
    }

    #[test]
    fn test_from_bars() {
        let bars: Vec<Bar> = (0..5)
            .map(|i| make_bar(i, 2000.0 + i as f64, Some(100.0)))
            .collect();
        let frame = PriceFrame::from_bars(&bars).unwrap();

        assert_eq!(frame.len(), 5);
        assert_eq!(frame.close()[4], 2004.0);
        assert_eq!(frame.high()[0], 2002.0);
        assert!(frame.has_volume());
    }

    #[test]
    fn test_partial_volume_dropped() {
        let bars = vec![make_bar(0, 2000.0, Some(10.0)), make_bar(1, 2001.0, None)];
        let frame = PriceFrame::from_bars(&bars).unwrap();
        assert!(!frame.has_volume());
    }

    #[test]
    fn test_unsorted_index_rejected() {
        let bars = vec![make_bar(1, 2000.0, None), make_bar(0, 2001.0, None)];
        assert!(matches!(PriceFrame::from_bars(&bars), Err(Error::Data(_))));
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let bars = vec![make_bar(0, 2000.0, None), make_bar(0, 2001.0, None)];
        assert!(PriceFrame::from_bars(&bars).is_err());
    }

    #[test]
    fn test_length_mismatch() {
        let err = PriceFrame::new(
            vec![ts(0), ts(1)],
            vec![1.0, 2.0],
            vec![1.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_from_columns_requires_prices() {
        let err = PriceFrame::from_columns(
            vec![ts(0)],
            vec![("Open", vec![1.0]), ("High", vec![1.0]), ("Low", vec![1.0])],
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "Close"));
    }

    #[test]
    fn test_from_columns_optional_volume() {
        let frame = PriceFrame::from_columns(
            vec![ts(0), ts(1)],
            vec![
                ("Open", vec![1.0, 2.0]),
                ("High", vec![1.5, 2.5]),
                ("Low", vec![0.5, 1.5]),
                ("Close", vec![1.2, 2.2]),
                ("Adj Close", vec![1.2, 2.2]),
            ],
        )
        .unwrap();
        assert!(!frame.has_volume());
        assert_eq!(frame.column("Close"), Some(&[1.2, 2.2][..]));
        assert!(frame.column("Adj Close").is_none());
    }

    #[test]
    fn test_insert_feature_overwrites_in_place() {
        let bars: Vec<Bar> = (0..3).map(|i| make_bar(i, 2000.0, None)).collect();
        let mut frame = PriceFrame::from_bars(&bars).unwrap();

        frame.insert_feature("A", vec![1.0; 3]).unwrap();
        frame.insert_feature("B", vec![2.0; 3]).unwrap();
        frame.insert_feature("A", vec![3.0; 3]).unwrap();

        let names: Vec<&str> = frame.feature_names().collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(frame.feature("A"), Some(&[3.0, 3.0, 3.0][..]));
    }

    #[test]
    fn test_insert_feature_wrong_length() {
        let bars: Vec<Bar> = (0..3).map(|i| make_bar(i, 2000.0, None)).collect();
        let mut frame = PriceFrame::from_bars(&bars).unwrap();
        assert!(frame.insert_feature("A", vec![1.0; 2]).is_err());
        assert!(frame.feature("A").is_none());
    }

    #[test]
    fn test_first_complete_row() {
        let bars: Vec<Bar> = (0..4).map(|i| make_bar(i, 2000.0, None)).collect();
        let mut frame = PriceFrame::from_bars(&bars).unwrap();
        frame
            .insert_feature("A", vec![f64::NAN, 1.0, 1.0, 1.0])
            .unwrap();
        frame
            .insert_feature("B", vec![f64::NAN, f64::NAN, 1.0, 1.0])
            .unwrap();
        assert_eq!(frame.first_complete_row(), Some(2));

        frame.insert_feature("C", vec![f64::NAN; 4]).unwrap();
        assert_eq!(frame.first_complete_row(), None);
    }
}
