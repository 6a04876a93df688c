use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, TimestampNanosecondArray};
use arrow::record_batch::RecordBatch;
use theta_types::{Bar, Timeframe};

pub const MINUTE_NS: i64 = 60_000_000_000;

pub fn sample_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let base = 1.0 + (i as f64 * 0.3).sin() * 0.05;
            Bar::with_timeframe(
                i as i64 * MINUTE_NS,
                Timeframe::M1,
                base,
                base + 0.01,
                base - 0.01,
                base + 0.005,
                100.0 + i as f64,
            )
        })
        .collect()
}

pub fn bars_to_batch(bars: &[Bar]) -> RecordBatch {
    let column = |f: fn(&Bar) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(bars.iter().map(f).collect::<Vec<_>>()))
    };
    let timestamps: Vec<i64> = bars.iter().map(|b| b.timestamp_ns).collect();

    RecordBatch::try_from_iter(vec![
        (
            "timestamp",
            Arc::new(TimestampNanosecondArray::from(timestamps).with_timezone("UTC")) as ArrayRef,
        ),
        ("open", column(|b| b.open)),
        ("high", column(|b| b.high)),
        ("low", column(|b| b.low)),
        ("close", column(|b| b.close)),
        ("volume", column(|b| b.volume)),
    ])
    .unwrap()
}
