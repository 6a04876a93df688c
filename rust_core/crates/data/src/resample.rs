//! Resampling of a base table into a coarser timeframe.

use theta_types::{Bar, OhlcvTable, Timeframe};

/// Aggregates base bars into buckets of `timeframe`, aligned to epoch multiples.
///
/// open = first, high = max, low = min, close = last, volume = sum. Each
/// coarse bar gets `close_time_ns = bucket_start + duration - 1`, so a bucket
/// only becomes visible to the base timeframe once it has fully elapsed.
#[must_use]
pub fn resample(base: &OhlcvTable, timeframe: Timeframe) -> OhlcvTable {
    let step = timeframe.to_nanos();
    let mut out: Vec<Bar> = Vec::with_capacity(base.len() / 2 + 1);

    for bar in &base.bars {
        let bucket = bar.timestamp_ns.div_euclid(step) * step;
        match out.last_mut() {
            Some(current) if current.timestamp_ns == bucket => {
                current.high = current.high.max(bar.high);
                current.low = current.low.min(bar.low);
                current.close = bar.close;
                current.volume += bar.volume;
            }
            _ => out.push(Bar::with_timeframe(
                bucket, timeframe, bar.open, bar.high, bar.low, bar.close, bar.volume,
            )),
        }
    }

    OhlcvTable::with_timeframe(timeframe, out)
}
