//! Per-column selection scores.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use theta_types::SelectionMethod;

/// Scores for one surviving candidate column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionScore {
    /// Column name.
    pub column: String,
    /// Min-max normalized score per method, in [0, 1].
    pub scores: BTreeMap<SelectionMethod, f64>,
    /// Raw score per method before normalization.
    pub raw_scores: BTreeMap<SelectionMethod, f64>,
    /// Weighted average of the normalized scores; `None` when no method scored the column.
    pub combined: Option<f64>,
    /// 1-based rank among surviving columns.
    pub rank: usize,
    /// Whether the column made the top N.
    pub selected: bool,
}

impl SelectionScore {
    /// True when at least one method produced a valid score.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.combined.is_some()
    }
}
