//! No-look-ahead alignment of coarser timeframes onto the base timeframe.

use theta_types::{Bar, OhlcvTable, Timeframe};

/// Mapping from base row indices to coarser-timeframe bar indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeframeMapping {
    /// Coarser timeframe, if known.
    pub timeframe: Option<Timeframe>,
    /// Base index -> index of the last coarse bar completed at that row.
    pub base_to_coarse: Vec<Option<usize>>,
}

impl TimeframeMapping {
    /// Returns mapped index for a base index.
    #[must_use]
    pub fn map_index(&self, base_idx: usize) -> Option<usize> {
        self.base_to_coarse.get(base_idx).copied().flatten()
    }

    /// Returns mapping length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base_to_coarse.len()
    }

    /// Returns true when mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base_to_coarse.is_empty()
    }

    /// Number of base rows that have a completed coarse bar.
    #[must_use]
    pub fn mapped_rows(&self) -> usize {
        self.base_to_coarse.iter().filter(|v| v.is_some()).count()
    }
}

/// Build a base -> coarse mapping from completion times.
///
/// For each base close time, the mapped index is the latest coarse bar whose
/// close time is <= the base close time. A coarse bar that is still forming
/// when the base bar closes is never used.
#[must_use]
pub fn build_mapping(
    base_close_times: &[i64],
    coarse_close_times: &[i64],
    timeframe: Option<Timeframe>,
) -> TimeframeMapping {
    let mut mapping = Vec::with_capacity(base_close_times.len());
    if coarse_close_times.is_empty() {
        mapping.resize(base_close_times.len(), None);
        return TimeframeMapping {
            timeframe,
            base_to_coarse: mapping,
        };
    }

    let mut j = 0usize;
    let mut last_valid: Option<usize> = None;

    for &ts in base_close_times {
        while j < coarse_close_times.len() && coarse_close_times[j] <= ts {
            last_valid = Some(j);
            j += 1;
        }
        mapping.push(last_valid);
    }

    TimeframeMapping {
        timeframe,
        base_to_coarse: mapping,
    }
}

/// Completion instant of a bar known from its own close time or the table's
/// timeframe. `None` when the bar carries no duration (close time equal to
/// open time) and the table has no timeframe.
fn known_close(bar: &Bar, timeframe: Option<Timeframe>) -> Option<i64> {
    if bar.close_time_ns > bar.timestamp_ns {
        return Some(bar.close_time_ns);
    }
    timeframe.map(|tf| bar.timestamp_ns.saturating_add(tf.to_nanos() - 1))
}

/// True when some bar's completion time has to be inferred from the next
/// bar's open because neither the bar nor the table carries a duration.
#[must_use]
pub fn infers_completion(table: &OhlcvTable) -> bool {
    table
        .bars
        .iter()
        .any(|bar| known_close(bar, table.timeframe).is_none())
}

/// Completion times of base rows. A row without a known duration is treated
/// as complete at its open time.
#[must_use]
pub fn base_completion_times(table: &OhlcvTable) -> Vec<i64> {
    table
        .bars
        .iter()
        .map(|bar| known_close(bar, table.timeframe).unwrap_or(bar.timestamp_ns))
        .collect()
}

/// Completion times of coarse bars.
///
/// A bar without a known duration completes one nanosecond before the next
/// bar opens. The last such bar is still forming and never completes
/// (`i64::MAX`), so it is never mapped.
#[must_use]
pub fn coarse_completion_times(table: &OhlcvTable) -> Vec<i64> {
    let bars = &table.bars;
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            known_close(bar, table.timeframe).unwrap_or_else(|| {
                bars.get(i + 1)
                    .map_or(i64::MAX, |next| next.timestamp_ns.saturating_sub(1))
            })
        })
        .collect()
}

/// Builds the mapping between two tables from their completion times.
#[must_use]
pub fn map_tables(base: &OhlcvTable, coarse: &OhlcvTable) -> TimeframeMapping {
    build_mapping(
        &base_completion_times(base),
        &coarse_completion_times(coarse),
        coarse.timeframe,
    )
}

/// Forward-fills a native coarse series onto the base rows through `mapping`.
/// Rows without a completed coarse bar are NaN.
#[must_use]
pub fn forward_fill(mapping: &TimeframeMapping, coarse_values: &[f64]) -> Vec<f64> {
    mapping
        .base_to_coarse
        .iter()
        .map(|idx| {
            idx.and_then(|i| coarse_values.get(i).copied())
                .unwrap_or(f64::NAN)
        })
        .collect()
}
