//! Cross-timeframe family.
//!
//! Coarse indicators are computed on native coarse bars and forward-filled
//! onto base rows through a completion-time mapping, so a base row only ever
//! sees coarse bars that had already closed.

use crate::contract::{FeatureGenerator, GeneratorInput, GeneratorOutput};
use crate::error::GeneratorError;
use crate::numeric::{log_returns, rolling_apply, safe_div, sample_variance};
use crate::sink::{ColumnSink, insufficient_rows};
use theta_data::{forward_fill, infers_completion, map_tables, resample};
use theta_indicators::series::{roc_of, rsi_of};
use theta_types::{CrossTimeframeConfig, FeatureFamily, OhlcvTable};

/// Base-versus-coarse comparisons per coarser timeframe.
#[derive(Debug, Clone)]
pub struct CrossTimeframeGenerator {
    config: CrossTimeframeConfig,
}

impl CrossTimeframeGenerator {
    /// Creates the generator from its configuration section.
    #[must_use]
    pub fn new(config: CrossTimeframeConfig) -> Self {
        Self { config }
    }

    /// Supplied tables first, then resampled ones for timeframes not supplied.
    fn coarse_tables(
        &self,
        input: &GeneratorInput<'_>,
        sink: &mut ColumnSink,
    ) -> Vec<(String, OhlcvTable)> {
        let mut tables: Vec<(String, OhlcvTable)> = input
            .coarser
            .iter()
            .enumerate()
            .map(|(i, table)| {
                let tag = table
                    .timeframe
                    .map_or_else(|| format!("tf{}", i + 1), |tf| tf.column_tag());
                if infers_completion(table) {
                    sink.warn(format!(
                        "coarse table {tag} has bars without a known duration; completion \
                         inferred from the next bar open, last bar treated as incomplete"
                    ));
                }
                (tag, table.clone())
            })
            .collect();

        for &tf in &self.config.resample_to {
            if input.coarser.iter().any(|t| t.timeframe == Some(tf)) {
                continue;
            }
            if let Some(base_tf) = input.base.timeframe
                && tf <= base_tf
            {
                sink.warn(format!(
                    "resample target {tf} is not coarser than base timeframe {base_tf}"
                ));
                continue;
            }
            tables.push((tf.column_tag(), resample(input.base, tf)));
        }
        tables
    }

    fn compare(
        &self,
        tag: &str,
        base: &OhlcvTable,
        coarse: &OhlcvTable,
        base_closes: &[f64],
        base_vol: &[f64],
        base_roc: &[f64],
    ) -> Result<Vec<(String, Vec<f64>)>, GeneratorError> {
        if coarse.is_empty() {
            return Err(GeneratorError::MissingInput(format!(
                "coarse table {tag} is empty"
            )));
        }
        let cfg = &self.config;
        let mapping = map_tables(base, coarse);
        if mapping.mapped_rows() == 0 {
            return Err(GeneratorError::InsufficientRows {
                what: format!("completed {tag} bars"),
                required: 1,
                actual: 0,
            });
        }

        let coarse_closes = coarse.closes();
        let coarse_close = forward_fill(&mapping, &coarse_closes);
        let coarse_roc = forward_fill(&mapping, &roc_of(&coarse_closes, cfg.roc_period));
        let coarse_vol = forward_fill(
            &mapping,
            &rolling_std(&log_returns(&coarse_closes), cfg.volatility_window),
        );
        let coarse_rsi = forward_fill(&mapping, &rsi_of(&coarse_closes, cfg.rsi_period));

        let ratio = base_closes
            .iter()
            .zip(&coarse_close)
            .map(|(b, c)| safe_div(*b, *c))
            .collect();
        let diff = base_closes
            .iter()
            .zip(&coarse_close)
            .map(|(b, c)| (b - c).abs())
            .collect();
        let gap = base_roc.iter().zip(&coarse_roc).map(|(b, c)| b - c).collect();
        let vol_ratio = base_vol
            .iter()
            .zip(&coarse_vol)
            .map(|(b, c)| safe_div(*b, *c))
            .collect();

        let (p, w, r) = (cfg.roc_period, cfg.volatility_window, cfg.rsi_period);
        Ok(vec![
            (format!("{tag}_close_ratio"), ratio),
            (format!("{tag}_close_diff"), diff),
            (format!("{tag}_roc_{p}"), coarse_roc),
            (format!("{tag}_momentum_gap_{p}"), gap),
            (format!("{tag}_volatility_ratio_{w}"), vol_ratio),
            (format!("{tag}_rsi_{r}"), coarse_rsi),
        ])
    }
}

fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |s| sample_variance(s).sqrt())
}

impl FeatureGenerator for CrossTimeframeGenerator {
    fn name(&self) -> &str {
        "cross_timeframe"
    }

    fn family(&self) -> FeatureFamily {
        FeatureFamily::CrossTimeframe
    }

    fn generate(&self, input: &GeneratorInput<'_>) -> GeneratorOutput {
        let rows = input.rows();
        if rows < input.min_rows {
            return insufficient_rows(self.name(), self.family(), rows, input.min_rows);
        }

        let cfg = &self.config;
        let mut sink = ColumnSink::new(self.name(), self.family(), rows);
        if cfg.roc_period == 0 || cfg.volatility_window < 2 || cfg.rsi_period == 0 {
            sink.record(&GeneratorError::invalid_config(format!(
                "roc_period={}, volatility_window={}, rsi_period={} must be positive (window >= 2)",
                cfg.roc_period, cfg.volatility_window, cfg.rsi_period
            )));
            return sink.finish();
        }

        let tables = self.coarse_tables(input, &mut sink);
        if tables.is_empty() {
            sink.record(&GeneratorError::MissingInput(
                "no coarser timeframe supplied or configured".to_string(),
            ));
            return sink.finish();
        }

        let base_closes = input.base.closes();
        let base_vol = rolling_std(&log_returns(&base_closes), cfg.volatility_window);
        let base_roc = roc_of(&base_closes, cfg.roc_period);
        for (tag, coarse) in &tables {
            sink.push_result(self.compare(
                tag,
                input.base,
                coarse,
                &base_closes,
                &base_vol,
                &base_roc,
            ));
        }

        sink.finish()
    }
}
