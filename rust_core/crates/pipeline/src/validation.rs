//! Up-front configuration checks run before any generator starts.

use theta_selection::validate_selector_config;
use theta_types::{
    ConfigError, CrossTimeframeConfig, PipelineConfig, ProprietaryConfig, StatisticalConfig,
    TechnicalConfig, TemporalConfig,
};

/// Validates every section of `config`.
///
/// Disabled sections are still checked so a config that is invalid when
/// toggled on is rejected immediately.
///
/// # Errors
/// Returns [`ConfigError::InvalidParameter`] naming the first bad field.
pub fn validate_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.min_rows == 0 {
        return Err(ConfigError::invalid("min_rows", "must be > 0"));
    }
    validate_technical(&config.technical)?;
    validate_statistical(&config.statistical)?;
    validate_temporal(&config.temporal)?;
    validate_cross_timeframe(&config.cross_timeframe)?;
    validate_proprietary(&config.proprietary)?;
    validate_selector_config(&config.selector)
}

fn periods(param: &str, values: &[usize], min: usize) -> Result<(), ConfigError> {
    match values.iter().find(|&&p| p < min) {
        Some(p) => Err(ConfigError::invalid(param, format!("periods must be >= {min}, got {p}"))),
        None => Ok(()),
    }
}

fn period(param: &str, value: usize, min: usize) -> Result<(), ConfigError> {
    periods(param, &[value], min)
}

fn positive_finite(param: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(param, format!("must be finite and > 0, got {value}")))
    }
}

fn validate_technical(cfg: &TechnicalConfig) -> Result<(), ConfigError> {
    periods("technical.moving_averages.sma_periods", &cfg.moving_averages.sma_periods, 1)?;
    periods("technical.moving_averages.ema_periods", &cfg.moving_averages.ema_periods, 1)?;
    periods("technical.rsi.periods", &cfg.rsi.periods, 1)?;
    period("technical.stochastic.k_period", cfg.stochastic.k_period, 1)?;
    period("technical.stochastic.d_period", cfg.stochastic.d_period, 1)?;
    periods("technical.cci.periods", &cfg.cci.periods, 1)?;
    period("technical.bollinger.period", cfg.bollinger.period, 1)?;
    positive_finite("technical.bollinger.std_factor", cfg.bollinger.std_factor)?;
    periods("technical.atr.periods", &cfg.atr.periods, 1)?;
    period("technical.adx.period", cfg.adx.period, 1)?;
    positive_finite("technical.psar.step", cfg.psar.step)?;
    positive_finite("technical.psar.max_step", cfg.psar.max_step)?;
    if cfg.psar.step > cfg.psar.max_step {
        return Err(ConfigError::invalid(
            "technical.psar.step",
            format!("must be <= max_step ({})", cfg.psar.max_step),
        ));
    }
    period("technical.supertrend.period", cfg.supertrend.period, 1)?;
    positive_finite("technical.supertrend.multiplier", cfg.supertrend.multiplier)?;
    period("technical.volume.vwap_window", cfg.volume.vwap_window, 1)
}

fn validate_statistical(cfg: &StatisticalConfig) -> Result<(), ConfigError> {
    periods("statistical.windows", &cfg.windows, 2)?;
    if let Some(p) = cfg.percentiles.iter().find(|p| !(0.0..=100.0).contains(*p)) {
        return Err(ConfigError::invalid(
            "statistical.percentiles",
            format!("must lie in [0, 100], got {p}"),
        ));
    }
    if !cfg.variance_epsilon.is_finite() || cfg.variance_epsilon < 0.0 {
        return Err(ConfigError::invalid(
            "statistical.variance_epsilon",
            "must be finite and >= 0",
        ));
    }
    Ok(())
}

fn validate_temporal(cfg: &TemporalConfig) -> Result<(), ConfigError> {
    period("temporal.decomposition.period", cfg.decomposition.period, 2)
}

fn validate_cross_timeframe(cfg: &CrossTimeframeConfig) -> Result<(), ConfigError> {
    period("cross_timeframe.roc_period", cfg.roc_period, 1)?;
    period("cross_timeframe.volatility_window", cfg.volatility_window, 2)?;
    period("cross_timeframe.rsi_period", cfg.rsi_period, 1)
}

fn validate_proprietary(cfg: &ProprietaryConfig) -> Result<(), ConfigError> {
    period("proprietary.direction.lookback", cfg.direction.lookback, 1)?;
    let threshold = cfg.direction.threshold;
    if !(threshold.is_finite() && (0.0..=1.0).contains(&threshold)) {
        return Err(ConfigError::invalid(
            "proprietary.direction.threshold",
            format!("must lie in [0, 1], got {threshold}"),
        ));
    }

    let wave = &cfg.wave;
    period("proprietary.wave.fast", wave.fast, 1)?;
    period("proprietary.wave.signal", wave.signal, 1)?;
    if wave.fast >= wave.slow {
        return Err(ConfigError::invalid(
            "proprietary.wave.fast",
            format!("must be < slow ({}), got {}", wave.slow, wave.fast),
        ));
    }
    period("proprietary.wave.rsi_period", wave.rsi_period, 1)?;
    period("proprietary.wave.stoch_period", wave.stoch_period, 1)?;
    period("proprietary.wave.roc_period", wave.roc_period, 1)?;
    period("proprietary.wave.atr_period", wave.atr_period, 1)?;
    period("proprietary.wave.smoothing", wave.smoothing, 1)
}
