//! Technical-indicator family.

use crate::contract::{FeatureGenerator, GeneratorInput, GeneratorOutput};
use crate::error::GeneratorError;
use crate::sink::{ColumnSink, insufficient_rows};
use theta_indicators::{
    ADX, ATR, BollingerBands, CCI, EMA, Indicator, IntoMultiVecs, MultiOutputIndicator, OBV,
    ParabolicSar, RSI, SMA, Stochastic, SuperTrend, VWAP,
};
use theta_types::{Bar, FeatureFamily, TechnicalConfig};

type Block = Result<Vec<(String, Vec<f64>)>, GeneratorError>;

/// Moving averages, oscillators, bands, trend strength and volume indicators.
#[derive(Debug, Clone)]
pub struct TechnicalGenerator {
    config: TechnicalConfig,
}

impl TechnicalGenerator {
    /// Creates the generator from its configuration section.
    #[must_use]
    pub fn new(config: TechnicalConfig) -> Self {
        Self { config }
    }
}

fn single(name: String, indicator: &dyn Indicator, bars: &[Bar]) -> Block {
    indicator
        .validate(bars.len())
        .map_err(|e| GeneratorError::indicator(name.clone(), e))?;
    Ok(vec![(name, indicator.compute(bars))])
}

fn multi<M: MultiOutputIndicator>(names: Vec<String>, indicator: &M, bars: &[Bar]) -> Block {
    let label = names.first().cloned().unwrap_or_default();
    indicator
        .validate(bars.len())
        .map_err(|e| GeneratorError::indicator(label, e))?;
    Ok(names
        .into_iter()
        .zip(indicator.compute_all(bars).into_vecs())
        .collect())
}

impl FeatureGenerator for TechnicalGenerator {
    fn name(&self) -> &str {
        "technical"
    }

    fn family(&self) -> FeatureFamily {
        FeatureFamily::Technical
    }

    fn generate(&self, input: &GeneratorInput<'_>) -> GeneratorOutput {
        let rows = input.rows();
        if rows < input.min_rows {
            return insufficient_rows(self.name(), self.family(), rows, input.min_rows);
        }

        let bars = input.base.bars.as_slice();
        let cfg = &self.config;
        let mut sink = ColumnSink::new(self.name(), self.family(), rows);

        if cfg.moving_averages.enabled {
            for &p in &cfg.moving_averages.sma_periods {
                sink.push_result(single(format!("sma_{p}"), &SMA::new(p), bars));
            }
            for &p in &cfg.moving_averages.ema_periods {
                sink.push_result(single(format!("ema_{p}"), &EMA::new(p), bars));
            }
        }

        if cfg.rsi.enabled {
            for &p in &cfg.rsi.periods {
                sink.push_result(single(format!("rsi_{p}"), &RSI::new(p), bars));
            }
        }

        if cfg.stochastic.enabled {
            let (k, d) = (cfg.stochastic.k_period, cfg.stochastic.d_period);
            sink.push_result(multi(
                vec![format!("stoch_k_{k}"), format!("stoch_d_{k}_{d}")],
                &Stochastic::new(k, d),
                bars,
            ));
        }

        if cfg.cci.enabled {
            for &p in &cfg.cci.periods {
                sink.push_result(single(format!("cci_{p}"), &CCI::new(p), bars));
            }
        }

        if cfg.bollinger.enabled {
            let p = cfg.bollinger.period;
            sink.push_result(multi(
                ["upper", "middle", "lower", "width"]
                    .iter()
                    .map(|o| format!("bb_{o}_{p}"))
                    .collect(),
                &BollingerBands::new(p, cfg.bollinger.std_factor),
                bars,
            ));
        }

        if cfg.atr.enabled {
            for &p in &cfg.atr.periods {
                sink.push_result(single(format!("atr_{p}"), &ATR::new(p), bars));
            }
        }

        if cfg.adx.enabled {
            let p = cfg.adx.period;
            sink.push_result(multi(
                vec![
                    format!("plus_di_{p}"),
                    format!("minus_di_{p}"),
                    format!("adx_{p}"),
                    format!("adx_direction_{p}"),
                ],
                &ADX::new(p),
                bars,
            ));
        }

        if cfg.psar.enabled {
            sink.push_result(multi(
                vec!["psar".to_string(), "psar_direction".to_string()],
                &ParabolicSar::new(cfg.psar.step, cfg.psar.max_step),
                bars,
            ));
        }

        if cfg.supertrend.enabled {
            let p = cfg.supertrend.period;
            sink.push_result(multi(
                vec![format!("supertrend_{p}"), format!("supertrend_direction_{p}")],
                &SuperTrend::new(p, cfg.supertrend.multiplier),
                bars,
            ));
        }

        if cfg.volume.enabled {
            sink.push_result(single("obv".to_string(), &OBV, bars));
            sink.push_result(single("vwap".to_string(), &VWAP::cumulative(), bars));
            let w = cfg.volume.vwap_window;
            sink.push_result(single(format!("vwap_{w}"), &VWAP::rolling(w), bars));
        }

        sink.finish()
    }
}
