//! Explicit generator registration from configuration.

use crate::contract::FeatureGenerator;
use crate::impl_::{
    cross_timeframe::CrossTimeframeGenerator, proprietary::ProprietaryGenerator,
    statistical::StatisticalGenerator, technical::TechnicalGenerator, temporal::TemporalGenerator,
};
use std::sync::Arc;
use theta_types::PipelineConfig;

/// Builds the enabled generators in canonical family order.
///
/// The order fixes column order in the merged candidate set: technical,
/// statistical, temporal, cross-timeframe, proprietary.
#[must_use]
pub fn build_generators(config: &PipelineConfig) -> Vec<Arc<dyn FeatureGenerator>> {
    let mut generators: Vec<Arc<dyn FeatureGenerator>> = Vec::with_capacity(5);

    if config.technical.enabled {
        generators.push(Arc::new(TechnicalGenerator::new(config.technical.clone())));
    }
    if config.statistical.enabled {
        generators.push(Arc::new(StatisticalGenerator::new(config.statistical.clone())));
    }
    if config.temporal.enabled {
        generators.push(Arc::new(TemporalGenerator::new(config.temporal.clone())));
    }
    if config.cross_timeframe.enabled {
        generators.push(Arc::new(CrossTimeframeGenerator::new(
            config.cross_timeframe.clone(),
        )));
    }
    if config.proprietary.enabled {
        generators.push(Arc::new(ProprietaryGenerator::new(config.proprietary.clone())));
    }

    tracing::debug!(
        generators = generators.len(),
        "registered feature generators"
    );
    generators
}
