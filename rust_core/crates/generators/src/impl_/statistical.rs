//! Statistical-distribution family.

use std::collections::BTreeMap;

use crate::contract::{FeatureGenerator, GeneratorInput, GeneratorOutput};
use crate::error::GeneratorError;
use crate::numeric::{
    central_moments, log_returns, mean, param_tag, pearson, quantile_sorted, rolling_apply,
    rolling_apply_pair, safe_div, sample_variance, sorted,
};
use crate::sink::{ColumnSink, insufficient_rows};
use theta_indicators::zscore_of;
use theta_types::{FeatureFamily, StatisticalConfig};

/// Rolling distribution statistics on close and one-bar log returns.
#[derive(Debug, Clone)]
pub struct StatisticalGenerator {
    config: StatisticalConfig,
}

impl StatisticalGenerator {
    /// Creates the generator from its configuration section.
    #[must_use]
    pub fn new(config: StatisticalConfig) -> Self {
        Self { config }
    }

    fn series_block(&self, prefix: &str, values: &[f64], w: usize) -> Vec<(String, Vec<f64>)> {
        let eps = self.config.variance_epsilon;
        let scale = 10f64.powi(self.config.mode_decimals.min(15) as i32);
        let name = |stat: &str| format!("{prefix}_{stat}_{w}");

        let mut out = vec![
            (name("mean"), rolling_apply(values, w, mean)),
            (
                name("median"),
                rolling_apply(values, w, |s| quantile_sorted(&sorted(s), 0.5)),
            ),
            (name("mode"), rolling_apply(values, w, |s| mode(s, scale))),
            (
                name("std"),
                rolling_apply(values, w, |s| sample_variance(s).sqrt()),
            ),
            (name("var"), rolling_apply(values, w, sample_variance)),
            (
                name("range"),
                rolling_apply(values, w, |s| {
                    let sorted = sorted(s);
                    sorted[sorted.len() - 1] - sorted[0]
                }),
            ),
            (
                name("iqr"),
                rolling_apply(values, w, |s| {
                    let sorted = sorted(s);
                    quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25)
                }),
            ),
            (
                name("skew"),
                rolling_apply(values, w, |s| shape(s, eps).0),
            ),
            (
                name("kurt"),
                rolling_apply(values, w, |s| shape(s, eps).1),
            ),
            (
                name("jb"),
                rolling_apply(values, w, |s| {
                    let (skew, kurt) = shape(s, eps);
                    s.len() as f64 / 6.0 * (skew * skew + kurt * kurt / 4.0)
                }),
            ),
            (name("zscore"), zscore_of(values, w, eps)),
        ];

        for &p in &self.config.percentiles {
            let q = p / 100.0;
            out.push((
                name(&format!("p{}", param_tag(p))),
                rolling_apply(values, w, |s| quantile_sorted(&sorted(s), q)),
            ));
        }
        out
    }

    fn window_block(
        &self,
        w: usize,
        closes: &[f64],
        returns: &[f64],
        ranges: &[f64],
        volumes: &[f64],
    ) -> Result<Vec<(String, Vec<f64>)>, GeneratorError> {
        if w < 2 {
            return Err(GeneratorError::invalid_config(format!(
                "statistical window {w} must be at least 2"
            )));
        }
        if w > closes.len() {
            return Err(GeneratorError::InsufficientRows {
                what: format!("statistical window {w}"),
                required: w,
                actual: closes.len(),
            });
        }

        let mut out = self.series_block("close", closes, w);
        out.extend(self.series_block("ret", returns, w));
        out.push((
            format!("corr_close_volume_{w}"),
            rolling_apply_pair(closes, volumes, w, pearson),
        ));
        out.push((
            format!("corr_ret_volume_{w}"),
            rolling_apply_pair(returns, volumes, w, pearson),
        ));
        out.push((
            format!("corr_range_volume_{w}"),
            rolling_apply_pair(ranges, volumes, w, pearson),
        ));
        Ok(out)
    }

    fn expanding_block(&self, closes: &[f64]) -> Vec<(String, Vec<f64>)> {
        let n = closes.len();
        let mut exp_mean = vec![f64::NAN; n];
        let mut exp_std = vec![f64::NAN; n];
        let mut exp_z = vec![f64::NAN; n];

        // Welford running moments.
        let (mut m, mut s) = (0.0, 0.0);
        for (i, &x) in closes.iter().enumerate() {
            let k = (i + 1) as f64;
            let delta = x - m;
            m += delta / k;
            s += delta * (x - m);
            exp_mean[i] = m;
            if i > 0 {
                let var = s / (k - 1.0);
                exp_std[i] = var.sqrt();
                if var > self.config.variance_epsilon {
                    exp_z[i] = safe_div(x - m, var.sqrt());
                }
            }
        }

        vec![
            ("close_expanding_mean".to_string(), exp_mean),
            ("close_expanding_std".to_string(), exp_std),
            ("close_expanding_zscore".to_string(), exp_z),
        ]
    }
}

/// Skewness and excess kurtosis; NaN when the window is (near) flat.
fn shape(values: &[f64], eps: f64) -> (f64, f64) {
    let (m2, m3, m4) = central_moments(values);
    if m2 <= eps {
        return (f64::NAN, f64::NAN);
    }
    (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
}

/// Largest scaled magnitude that still maps to a distinct `i64` bucket.
const MODE_KEY_LIMIT: f64 = 9.0e18;

/// Most frequent value after rounding; ties resolve to the smallest value.
/// NaN when a scaled value does not fit a bucket key.
fn mode(values: &[f64], scale: f64) -> f64 {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for v in values {
        let key = (v * scale).round();
        if key.is_nan() || key.abs() >= MODE_KEY_LIMIT {
            return f64::NAN;
        }
        *counts.entry(key as i64).or_insert(0) += 1;
    }
    let mut best: Option<(i64, usize)> = None;
    for (&key, &count) in &counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((key, count));
        }
    }
    best.map_or(f64::NAN, |(key, _)| key as f64 / scale)
}

impl FeatureGenerator for StatisticalGenerator {
    fn name(&self) -> &str {
        "statistical"
    }

    fn family(&self) -> FeatureFamily {
        FeatureFamily::Statistical
    }

    fn generate(&self, input: &GeneratorInput<'_>) -> GeneratorOutput {
        let rows = input.rows();
        if rows < input.min_rows {
            return insufficient_rows(self.name(), self.family(), rows, input.min_rows);
        }

        let base = input.base;
        let closes = base.closes();
        let volumes = base.volumes();
        let returns = log_returns(&closes);
        let ranges: Vec<f64> = base.bars.iter().map(|b| b.range()).collect();
        let mut sink = ColumnSink::new(self.name(), self.family(), rows);

        for &p in &self.config.percentiles {
            if !(0.0..=100.0).contains(&p) {
                sink.record(&GeneratorError::invalid_config(format!(
                    "percentile {p} outside 0..=100"
                )));
            }
        }

        for &w in &self.config.windows {
            sink.push_result(self.window_block(w, &closes, &returns, &ranges, &volumes));
        }

        if self.config.expanding {
            for (name, values) in self.expanding_block(&closes) {
                sink.push(name, values);
            }
        }

        sink.finish()
    }
}
