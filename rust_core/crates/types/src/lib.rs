//! Theta Types
//!
//! Core data structures for the Theta feature engine.
//! This crate provides bars, timeframes, the OHLCV input table,
//! pipeline configuration, and the diagnostics shared by every stage.

#![deny(clippy::all)]

pub mod bar;
pub mod column;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod table;
pub mod timeframe;

// Re-export main types for convenience
pub use bar::Bar;
pub use column::CandidateColumn;
pub use config::{
    AdxConfig, AtrConfig, BollingerConfig, CciConfig, CrossTimeframeConfig, DecompositionConfig,
    DirectionConfig, MovingAverageConfig, PipelineConfig, ProprietaryConfig, PsarConfig,
    RsiConfig, SelectionMethod, SelectorConfig, StatisticalConfig, StochasticConfig,
    SuperTrendConfig, TargetConfig, TechnicalConfig, TemporalConfig, VolumeConfig, WaveConfig,
};
pub use diagnostic::{Diagnostic, DiagnosticKind, FeatureFamily};
pub use error::ConfigError;
pub use table::OhlcvTable;
pub use timeframe::{ParseTimeframeError, Timeframe};
