//! Theta Indicators
//!
//! Windowed indicator primitives used by the feature generators.
//!
//! # Features
//! - Indicator trait with vectorized computation over bars
//! - Multi-output indicators (Bollinger, Stochastic, ADX, MACD, ...)
//! - Plain-series kernels (`series`) for derived inputs
//!
//! # Available Indicators
//! - SMA / EMA / ROC
//! - RSI, Stochastic %K/%D, CCI
//! - ATR, Bollinger Bands (with width), Z-Score
//! - ADX with +DI/-DI, Parabolic SAR, SuperTrend, MACD
//! - OBV, VWAP (cumulative and rolling)
//!
//! Warmup rows are `f64::NAN`; degenerate windows (flat range, zero volume,
//! zero deviation) also yield NaN rather than panicking.

pub mod error;
pub mod impl_;
pub mod series;
pub mod traits;

pub use error::IndicatorError;
pub use traits::{Indicator, IntoMultiVecs, MultiOutputIndicator};

pub use impl_::{
    adx::{ADX, AdxResult, sign},
    atr::{ATR, true_range},
    bollinger::{BollingerBands, BollingerResult},
    cci::CCI,
    ema::EMA,
    macd::{MACD, MacdResult},
    obv::OBV,
    psar::{ParabolicSar, PsarResult},
    roc::ROC,
    rsi::RSI,
    sma::SMA,
    stochastic::{Stochastic, StochasticResult, stochastic_k},
    supertrend::{SuperTrend, SuperTrendResult},
    vwap::VWAP,
    z_score::{ZScore, zscore_of},
};
