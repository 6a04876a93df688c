//! Column-oriented view over a bar sequence.

use crate::bar::Bar;
use crate::timeframe::Timeframe;

/// Time-ordered OHLCV table handed to the pipeline.
///
/// The table is read-only for every consumer; generators borrow it and
/// derive their own column vectors.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OhlcvTable {
    /// Timeframe of the bars, if known.
    pub timeframe: Option<Timeframe>,
    /// Bars in ascending timestamp order.
    pub bars: Vec<Bar>,
}

impl OhlcvTable {
    /// Creates a table without timeframe information.
    #[must_use]
    pub fn new(bars: Vec<Bar>) -> Self {
        Self {
            timeframe: None,
            bars,
        }
    }

    /// Creates a table tagged with its timeframe.
    #[must_use]
    pub fn with_timeframe(timeframe: Timeframe, bars: Vec<Bar>) -> Self {
        Self {
            timeframe: Some(timeframe),
            bars,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Open-time timestamps.
    #[must_use]
    pub fn timestamps(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.timestamp_ns).collect()
    }

    /// Close-time timestamps.
    #[must_use]
    pub fn close_times(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.close_time_ns).collect()
    }

    /// Open prices.
    #[must_use]
    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    /// High prices.
    #[must_use]
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Low prices.
    #[must_use]
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Close prices.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes.
    #[must_use]
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

impl From<Vec<Bar>> for OhlcvTable {
    fn from(bars: Vec<Bar>) -> Self {
        Self::new(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_accessors() {
        let table = OhlcvTable::with_timeframe(
            Timeframe::M1,
            vec![
                Bar::with_timeframe(0, Timeframe::M1, 1.0, 2.0, 0.5, 1.5, 10.0),
                Bar::with_timeframe(60_000_000_000, Timeframe::M1, 1.5, 2.5, 1.0, 2.0, 20.0),
            ],
        );

        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert_eq!(table.timestamps(), vec![0, 60_000_000_000]);
        assert_eq!(table.closes(), vec![1.5, 2.0]);
        assert_eq!(table.volumes(), vec![10.0, 20.0]);
        assert_eq!(table.close_times()[0], 59_999_999_999);
    }
}
