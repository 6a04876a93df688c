//! Proprietary composite signals: high/low direction and the wave oscillator.

use crate::contract::{FeatureGenerator, GeneratorInput, GeneratorOutput};
use crate::error::GeneratorError;
use crate::numeric::safe_div;
use crate::sink::{ColumnSink, insufficient_rows};
use theta_indicators::series::{ema_of, roc_of, rsi_of};
use theta_indicators::{ATR, Indicator, MACD, MultiOutputIndicator, sign, stochastic_k};
use theta_types::{Bar, DirectionConfig, FeatureFamily, ProprietaryConfig, WaveConfig};

type Block = Result<Vec<(String, Vec<f64>)>, GeneratorError>;

/// Deterministic composite signals computed from the input window only.
#[derive(Debug, Clone)]
pub struct ProprietaryGenerator {
    config: ProprietaryConfig,
}

impl ProprietaryGenerator {
    /// Creates the generator from its configuration section.
    #[must_use]
    pub fn new(config: ProprietaryConfig) -> Self {
        Self { config }
    }
}

/// Score in [-1, 1], signal in {-1, 0, 1} and channel position in [0, 1].
pub fn direction_block(bars: &[Bar], cfg: &DirectionConfig) -> Block {
    let lookback = cfg.lookback;
    if lookback == 0 {
        return Err(GeneratorError::invalid_config("direction lookback must be greater than 0"));
    }
    if bars.len() <= lookback {
        return Err(GeneratorError::InsufficientRows {
            what: "high/low direction".to_string(),
            required: lookback + 1,
            actual: bars.len(),
        });
    }

    let n = bars.len();
    let mut votes = vec![0.0; n];
    for (i, pair) in bars.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        let hh = f64::from(u8::from(cur.high > prev.high));
        let hl = f64::from(u8::from(cur.low > prev.low));
        let lh = f64::from(u8::from(cur.high < prev.high));
        let ll = f64::from(u8::from(cur.low < prev.low));
        votes[i + 1] = hh + hl - lh - ll;
    }

    let mut score = vec![f64::NAN; n];
    let mut signal = vec![f64::NAN; n];
    let mut channel = vec![f64::NAN; n];
    let denom = 2.0 * lookback as f64;
    let mut sum: f64 = votes[1..=lookback].iter().sum();
    for i in lookback..n {
        if i > lookback {
            sum += votes[i] - votes[i - lookback];
        }
        let s = (sum / denom).clamp(-1.0, 1.0);
        score[i] = s;
        signal[i] = if s > cfg.threshold {
            1.0
        } else if s < -cfg.threshold {
            -1.0
        } else {
            0.0
        };
    }

    for i in (lookback - 1)..n {
        let window = &bars[i + 1 - lookback..=i];
        let hh = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let ll = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        channel[i] = safe_div(bars[i].close - ll, hh - ll);
    }

    Ok(vec![
        (format!("hl_direction_score_{lookback}"), score),
        (format!("hl_direction_signal_{lookback}"), signal),
        (format!("hl_channel_position_{lookback}"), channel),
    ])
}

/// Wave value, its signal line, zero-cross flag and side.
pub fn wave_block(bars: &[Bar], cfg: &WaveConfig) -> Block {
    if cfg.smoothing == 0 || cfg.signal == 0 {
        return Err(GeneratorError::invalid_config(
            "wave smoothing and signal periods must be greater than 0",
        ));
    }
    let macd = MACD::new(cfg.fast, cfg.slow, cfg.signal);
    macd.validate(bars.len())
        .map_err(|e| GeneratorError::indicator("wave", e))?;

    let n = bars.len();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let histogram = macd.compute_all(bars).histogram;
    let atr = ATR::new(cfg.atr_period).compute(bars);
    let rsi = rsi_of(&closes, cfg.rsi_period);
    let stoch = stochastic_k(bars, cfg.stoch_period);
    let roc = roc_of(&closes, cfg.roc_period);

    let raw: Vec<f64> = (0..n)
        .map(|i| {
            let components = [
                safe_div(histogram[i], atr[i]).tanh(),
                (rsi[i] - 50.0) / 50.0,
                (stoch[i] - 50.0) / 50.0,
                (roc[i] / 10.0).tanh(),
            ];
            let (sum, count) = components
                .iter()
                .filter(|c| c.is_finite())
                .fold((0.0, 0usize), |(s, k), c| (s + c, k + 1));
            if count == 0 { f64::NAN } else { sum / count as f64 }
        })
        .collect();

    let wave: Vec<f64> = ema_of(&raw, cfg.smoothing)
        .into_iter()
        .map(|v| v.clamp(-1.0, 1.0))
        .collect();
    let wave_signal = ema_of(&wave, cfg.signal);
    let mut cross = vec![f64::NAN; n];
    for i in 1..n {
        let (prev, cur) = (wave[i - 1], wave[i]);
        if prev.is_finite() && cur.is_finite() {
            cross[i] = if prev <= 0.0 && cur > 0.0 {
                1.0
            } else if prev >= 0.0 && cur < 0.0 {
                -1.0
            } else {
                0.0
            };
        }
    }
    let side = wave.iter().map(|v| sign(*v)).collect();

    Ok(vec![
        ("wave".to_string(), wave),
        ("wave_signal".to_string(), wave_signal),
        ("wave_cross".to_string(), cross),
        ("wave_side".to_string(), side),
    ])
}

impl FeatureGenerator for ProprietaryGenerator {
    fn name(&self) -> &str {
        "proprietary"
    }

    fn family(&self) -> FeatureFamily {
        FeatureFamily::Proprietary
    }

    fn generate(&self, input: &GeneratorInput<'_>) -> GeneratorOutput {
        let rows = input.rows();
        if rows < input.min_rows {
            return insufficient_rows(self.name(), self.family(), rows, input.min_rows);
        }

        let bars = input.base.bars.as_slice();
        let mut sink = ColumnSink::new(self.name(), self.family(), rows);
        if self.config.direction.enabled {
            sink.push_result(direction_block(bars, &self.config.direction));
        }
        if self.config.wave.enabled {
            sink.push_result(wave_block(bars, &self.config.wave));
        }
        sink.finish()
    }
}
