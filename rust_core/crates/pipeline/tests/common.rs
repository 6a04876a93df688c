use proptest::prelude::*;
use theta_types::{Bar, OhlcvTable, Timeframe};

/// Start of 2024 in epoch nanoseconds (a Monday, 00:00 UTC).
pub const START_NS: i64 = 1_704_067_200_000_000_000;

fn hourly(bars: impl Iterator<Item = (f64, f64, f64, f64, f64)>) -> OhlcvTable {
    let step = Timeframe::H1.to_nanos();
    let bars = bars
        .enumerate()
        .map(|(i, (open, high, low, close, volume))| {
            Bar::with_timeframe(START_NS + i as i64 * step, Timeframe::H1, open, high, low, close, volume)
        })
        .collect();
    OhlcvTable::with_timeframe(Timeframe::H1, bars)
}

/// Deterministic hourly series: drift, a slow cycle and fast noise.
pub fn hourly_table(n: usize) -> OhlcvTable {
    hourly((0..n).map(|i| {
        let x = i as f64;
        let close = 100.0 + 0.01 * x + 5.0 * (0.07 * x).sin() + 0.3 * (1.3 * x).sin();
        let open = close - 0.2 * (0.9 * x).cos();
        let high = open.max(close) + 0.25 + 0.1 * (0.5 * x).sin().abs();
        let low = open.min(close) - 0.25 - 0.1 * (0.3 * x).cos().abs();
        let volume = 1_000.0 + 200.0 * (0.2 * x).sin() + 50.0 * (i % 7) as f64;
        (open, high, low, close, volume)
    }))
}

/// Random valid hourly tables of `len` rows.
pub fn valid_table(len: usize) -> impl Strategy<Value = OhlcvTable> {
    let bar = (1.0f64..2.0, 0.0001f64..0.01, 0.0f64..1.0, 0.0f64..1_000.0).prop_map(
        |(mid, spread, close_pos, volume)| {
            let (low, high) = (mid - spread, mid + spread);
            (mid, high, low, (low + close_pos * (high - low)).min(high), volume)
        },
    );
    prop::collection::vec(bar, len..=len).prop_map(|bars| hourly(bars.into_iter()))
}
