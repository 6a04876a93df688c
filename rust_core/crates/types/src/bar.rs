use crate::timeframe::Timeframe;

/// Represents one OHLCV bar.
/// `timestamp_ns` is the **open time**; `close_time_ns` is the instant the bar is complete.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bar {
    /// Unix epoch nanoseconds UTC (open time)
    pub timestamp_ns: i64,
    /// Unix epoch nanoseconds UTC (close time = open + duration - 1ns)
    pub close_time_ns: i64,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume
    pub volume: f64,
}

impl Bar {
    /// Creates a bar whose duration is unknown; the bar is treated as complete at its timestamp.
    #[must_use]
    pub fn new(timestamp_ns: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp_ns,
            close_time_ns: timestamp_ns,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Creates a bar of a known timeframe; `close_time_ns` is derived from the open time.
    #[must_use]
    pub fn with_timeframe(
        timestamp_ns: i64,
        timeframe: Timeframe,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp_ns,
            close_time_ns: timestamp_ns.saturating_add(timeframe.to_nanos() - 1),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price `(high + low + close) / 3`.
    #[inline]
    #[must_use]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// High-low range of the bar.
    #[inline]
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
