//! Column accumulation and outcome derivation shared by all generators.

use std::collections::HashSet;

use crate::contract::{GeneratorOutcome, GeneratorOutput, GeneratorStatus};
use crate::error::GeneratorError;
use crate::numeric::sanitize_non_finite;
use theta_types::{Diagnostic, FeatureFamily};

/// Collects a generator's columns and diagnostics, then derives its status.
///
/// - Columns of the wrong length are rejected as errors.
/// - A repeated name keeps the first column and records a warning.
/// - `±inf` is replaced by NaN; affected columns are reported in one warning.
/// - All-NaN columns are dropped; dropped names are reported in one warning.
#[derive(Debug)]
pub struct ColumnSink {
    generator: String,
    family: FeatureFamily,
    rows: usize,
    columns: Vec<(String, Vec<f64>)>,
    names: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
    errors: usize,
    sanitized: Vec<String>,
    empty: Vec<String>,
}

impl ColumnSink {
    /// Creates a sink for `rows` base rows.
    #[must_use]
    pub fn new(generator: impl Into<String>, family: FeatureFamily, rows: usize) -> Self {
        Self {
            generator: generator.into(),
            family,
            rows,
            columns: Vec::new(),
            names: HashSet::new(),
            diagnostics: Vec::new(),
            errors: 0,
            sanitized: Vec::new(),
            empty: Vec::new(),
        }
    }

    /// Number of rows each column must have.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Adds one column.
    pub fn push(&mut self, name: impl Into<String>, mut values: Vec<f64>) {
        let name = name.into();
        if values.len() != self.rows {
            self.error(
                format!(
                    "column {name} has {} values for {} rows",
                    values.len(),
                    self.rows
                ),
                vec![name],
            );
            return;
        }
        if self.names.contains(&name) {
            self.warn_columns(
                format!("duplicate column {name} ignored, first definition kept"),
                vec![name],
            );
            return;
        }
        if sanitize_non_finite(&mut values) {
            self.sanitized.push(name.clone());
        }
        if values.iter().all(|v| v.is_nan()) {
            self.empty.push(name);
            return;
        }
        self.names.insert(name.clone());
        self.columns.push((name, values));
    }

    /// Records a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warn_columns(message, Vec::new());
    }

    /// Records a warning about specific columns.
    pub fn warn_columns(&mut self, message: impl Into<String>, columns: Vec<String>) {
        self.diagnostics
            .push(Diagnostic::generator_warning(self.generator.clone(), message).with_columns(columns));
    }

    /// Records an error.
    pub fn error(&mut self, message: impl Into<String>, columns: Vec<String>) {
        self.errors += 1;
        self.diagnostics
            .push(Diagnostic::generator_failure(self.generator.clone(), message).with_columns(columns));
    }

    /// Records a generator error as a warning or an error depending on its kind.
    pub fn record(&mut self, err: &GeneratorError) {
        if err.is_recoverable() {
            self.warn(err.to_string());
        } else {
            self.error(err.to_string(), Vec::new());
        }
    }

    /// Pushes a block of columns or records why it could not be computed.
    pub fn push_result(&mut self, block: Result<Vec<(String, Vec<f64>)>, GeneratorError>) {
        match block {
            Ok(columns) => {
                for (name, values) in columns {
                    self.push(name, values);
                }
            }
            Err(err) => self.record(&err),
        }
    }

    /// Derives the status and returns the output.
    #[must_use]
    pub fn finish(mut self) -> GeneratorOutput {
        if !self.sanitized.is_empty() {
            let cols = std::mem::take(&mut self.sanitized);
            self.warn_columns("non-finite values replaced by NaN", cols);
        }
        if !self.empty.is_empty() {
            let cols = std::mem::take(&mut self.empty);
            self.warn_columns("columns without any finite value dropped", cols);
        }

        let status = if self.diagnostics.is_empty() {
            GeneratorStatus::Succeeded
        } else if self.errors > 0 && self.columns.is_empty() {
            GeneratorStatus::Failed
        } else {
            GeneratorStatus::PartiallySucceeded
        };

        let names = self.columns.iter().map(|(n, _)| n.clone()).collect();
        GeneratorOutput {
            columns: self.columns,
            outcome: GeneratorOutcome {
                generator: self.generator,
                family: self.family,
                status,
                columns: names,
                diagnostics: self.diagnostics,
            },
        }
    }
}

/// Returns the early output for a windowed generator below `min_rows`.
#[must_use]
pub fn insufficient_rows(
    generator: &str,
    family: FeatureFamily,
    rows: usize,
    min_rows: usize,
) -> GeneratorOutput {
    let mut sink = ColumnSink::new(generator, family, rows);
    sink.record(&GeneratorError::InsufficientRows {
        what: generator.to_string(),
        required: min_rows,
        actual: rows,
    });
    sink.finish()
}
