//! Candidate feature columns shared between the merge and the selector.

use std::sync::Arc;

use crate::diagnostic::FeatureFamily;

/// One named numeric column aligned 1:1 with the input rows.
///
/// Values are immutable and shared; cloning a column only bumps a refcount.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateColumn {
    /// Unique name after the merge.
    pub name: String,
    /// Generator that produced the column.
    pub generator: String,
    /// Family tag.
    pub family: FeatureFamily,
    /// Values, NaN where undefined.
    pub values: Arc<[f64]>,
}

impl CandidateColumn {
    /// Creates a column, taking ownership of `values`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        generator: impl Into<String>,
        family: FeatureFamily,
        values: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            generator: generator.into(),
            family,
            values: values.into(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when both columns point at the same buffer.
    #[must_use]
    pub fn shares_values_with(&self, other: &CandidateColumn) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}
