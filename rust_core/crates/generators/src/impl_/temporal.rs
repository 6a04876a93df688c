//! Temporal family: calendar fields, cyclical encodings and a causal
//! seasonal decomposition of close.

use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::contract::{FeatureGenerator, GeneratorInput, GeneratorOutput};
use crate::error::GeneratorError;
use crate::sink::ColumnSink;
use theta_indicators::series::sma_of;
use theta_types::{FeatureFamily, TemporalConfig};

/// Calendar features derived from bar open times (UTC).
#[derive(Debug, Clone)]
pub struct TemporalGenerator {
    config: TemporalConfig,
}

/// Trend, seasonal and residual components.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Trailing mean of `period` closes
    pub trend: Vec<f64>,
    /// Expanding mean of detrended values at the same phase
    pub seasonal: Vec<f64>,
    /// close - trend - seasonal
    pub residual: Vec<f64>,
}

impl TemporalGenerator {
    /// Creates the generator from its configuration section.
    #[must_use]
    pub fn new(config: TemporalConfig) -> Self {
        Self { config }
    }
}

/// Additive decomposition using only rows up to and including each row.
#[must_use]
pub fn causal_decomposition(closes: &[f64], period: usize) -> Decomposition {
    let n = closes.len();
    let trend = sma_of(closes, period);
    let mut seasonal = vec![f64::NAN; n];
    let mut residual = vec![f64::NAN; n];
    if period == 0 {
        return Decomposition {
            trend,
            seasonal,
            residual,
        };
    }

    let mut phase_sum = vec![0.0; period];
    let mut phase_count = vec![0usize; period];
    for i in 0..n {
        let detrended = closes[i] - trend[i];
        let phase = i % period;
        if detrended.is_finite() {
            phase_sum[phase] += detrended;
            phase_count[phase] += 1;
        }
        if phase_count[phase] > 0 {
            seasonal[i] = phase_sum[phase] / phase_count[phase] as f64;
            residual[i] = closes[i] - trend[i] - seasonal[i];
        }
    }

    Decomposition {
        trend,
        seasonal,
        residual,
    }
}

fn cyclical(values: &[f64], cycle: f64) -> (Vec<f64>, Vec<f64>) {
    values
        .iter()
        .map(|v| {
            let angle = TAU * v / cycle;
            (angle.sin(), angle.cos())
        })
        .unzip()
}

impl FeatureGenerator for TemporalGenerator {
    fn name(&self) -> &str {
        "temporal"
    }

    fn family(&self) -> FeatureFamily {
        FeatureFamily::Temporal
    }

    fn is_windowed(&self) -> bool {
        false
    }

    fn generate(&self, input: &GeneratorInput<'_>) -> GeneratorOutput {
        let rows = input.rows();
        let mut sink = ColumnSink::new(self.name(), self.family(), rows);

        let mut hour = Vec::with_capacity(rows);
        let mut dow = Vec::with_capacity(rows);
        let mut dom = Vec::with_capacity(rows);
        let mut month = Vec::with_capacity(rows);
        let mut year = Vec::with_capacity(rows);
        for bar in &input.base.bars {
            let ts: DateTime<Utc> = DateTime::from_timestamp_nanos(bar.timestamp_ns);
            hour.push(f64::from(ts.hour()));
            dow.push(f64::from(ts.weekday().num_days_from_monday()));
            dom.push(f64::from(ts.day()));
            month.push(f64::from(ts.month()));
            year.push(f64::from(ts.year()));
        }

        if self.config.cyclical {
            let dom0: Vec<f64> = dom.iter().map(|d| d - 1.0).collect();
            let month0: Vec<f64> = month.iter().map(|m| m - 1.0).collect();
            for (name, values, cycle) in [
                ("hour", &hour, 24.0),
                ("day_of_week", &dow, 7.0),
                ("day_of_month", &dom0, 31.0),
                ("month", &month0, 12.0),
            ] {
                let (sin, cos) = cyclical(values, cycle);
                sink.push(format!("{name}_sin"), sin);
                sink.push(format!("{name}_cos"), cos);
            }
        }

        if self.config.calendar {
            sink.push("hour", hour);
            sink.push("day_of_week", dow);
            sink.push("day_of_month", dom);
            sink.push("month", month);
            sink.push("year", year);
        }

        let decomposition = &self.config.decomposition;
        if decomposition.enabled {
            let period = decomposition.period;
            if period == 0 {
                sink.record(&GeneratorError::invalid_config(
                    "decomposition period must be greater than 0",
                ));
            } else if rows > 2 * period {
                let d = causal_decomposition(&input.base.closes(), period);
                sink.push(format!("decomp_trend_{period}"), d.trend);
                sink.push(format!("decomp_seasonal_{period}"), d.seasonal);
                sink.push(format!("decomp_residual_{period}"), d.residual);
            } else {
                sink.record(&GeneratorError::InsufficientRows {
                    what: format!("seasonal decomposition (period {period})"),
                    required: 2 * period + 1,
                    actual: rows,
                });
            }
        }

        sink.finish()
    }
}
