//! Theta Generators
//!
//! Feature generators for the Theta feature engine. Each generator turns the
//! base OHLCV table (plus optional coarser tables) into named numeric columns
//! aligned 1:1 with the base rows.
//!
//! # Families
//! - Technical: moving averages, oscillators, bands, trend strength, volume
//! - Statistical: rolling distribution statistics and correlations
//! - Temporal: calendar fields, cyclical encodings, causal decomposition
//! - Cross-timeframe: base vs. coarser series without look-ahead
//! - Proprietary: high/low direction and the wave oscillator
//!
//! Generators never return errors to the caller. Problems become diagnostics
//! on the [`GeneratorOutcome`] and the affected columns are omitted.

#![deny(clippy::all)]

pub mod contract;
pub mod error;
pub mod impl_;
pub mod numeric;
pub mod registry;
pub mod sink;

pub use contract::{
    FeatureGenerator, GeneratorInput, GeneratorOutcome, GeneratorOutput, GeneratorStatus,
};
pub use error::GeneratorError;
pub use registry::build_generators;
pub use sink::ColumnSink;

pub use impl_::{
    cross_timeframe::CrossTimeframeGenerator,
    proprietary::ProprietaryGenerator,
    statistical::StatisticalGenerator,
    technical::TechnicalGenerator,
    temporal::{Decomposition, TemporalGenerator, causal_decomposition},
};
