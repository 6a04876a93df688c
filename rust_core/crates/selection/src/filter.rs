//! Zero-variance pre-filter.

use crate::stats::{finite, variance};
use theta_types::CandidateColumn;

/// Splits columns into survivors (indices) and dropped names.
///
/// A column is dropped when it has fewer than two finite values or its
/// variance over finite values is `<= epsilon`.
#[must_use]
pub fn variance_filter(columns: &[CandidateColumn], epsilon: f64) -> (Vec<usize>, Vec<String>) {
    let mut survivors = Vec::with_capacity(columns.len());
    let mut dropped = Vec::new();

    for (i, column) in columns.iter().enumerate() {
        let values = finite(&column.values);
        if values.len() >= 2 && variance(&values) > epsilon {
            survivors.push(i);
        } else {
            dropped.push(column.name.clone());
        }
    }

    (survivors, dropped)
}
