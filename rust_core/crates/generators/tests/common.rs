use theta_types::{Bar, OhlcvTable, Timeframe};

/// Start of 2024 in epoch nanoseconds (a Monday, 00:00 UTC).
pub const START_NS: i64 = 1_704_067_200_000_000_000;

/// Deterministic hourly series with a drift, a slow cycle and fast noise.
pub fn hourly_table(n: usize) -> OhlcvTable {
    let step = Timeframe::H1.to_nanos();
    let bars = (0..n)
        .map(|i| {
            let x = i as f64;
            let close = 100.0 + 0.01 * x + 5.0 * (0.07 * x).sin() + 0.3 * (1.3 * x).sin();
            let open = close - 0.2 * (0.9 * x).cos();
            let high = open.max(close) + 0.25 + 0.1 * (0.5 * x).sin().abs();
            let low = open.min(close) - 0.25 - 0.1 * (0.3 * x).cos().abs();
            let volume = 1_000.0 + 200.0 * (0.2 * x).sin() + 50.0 * (i % 7) as f64;
            Bar::with_timeframe(START_NS + i as i64 * step, Timeframe::H1, open, high, low, close, volume)
        })
        .collect();
    OhlcvTable::with_timeframe(Timeframe::H1, bars)
}
