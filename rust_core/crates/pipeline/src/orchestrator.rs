//! Parallel generator fan-out and the collision-resolving merge.

use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use theta_generators::{
    FeatureGenerator, GeneratorInput, GeneratorOutcome, GeneratorOutput, GeneratorStatus,
    build_generators,
};
use theta_types::{CandidateColumn, OhlcvTable, PipelineConfig};

use crate::cancel::CancellationToken;

/// Merged candidate set of one run.
#[derive(Debug, Clone)]
pub struct MergedCandidates {
    /// Unique-named columns in canonical generator order.
    pub columns: Vec<CandidateColumn>,
    /// One outcome per registered generator, in canonical order.
    pub outcomes: Vec<GeneratorOutcome>,
    /// Whether cancellation prevented at least one generator from starting.
    pub cancelled: bool,
}

impl MergedCandidates {
    /// True when at least one generator contributed columns.
    #[must_use]
    pub fn has_output(&self) -> bool {
        self.outcomes.iter().any(GeneratorOutcome::contributed)
    }
}

/// Runs generators independently and merges their columns.
pub struct Orchestrator {
    generators: Vec<Arc<dyn FeatureGenerator>>,
    min_rows: usize,
}

impl Orchestrator {
    /// Registers the generators enabled in `config`.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::with_generators(build_generators(config), config.min_rows)
    }

    /// Uses an explicit generator list (order is the merge order).
    #[must_use]
    pub fn with_generators(generators: Vec<Arc<dyn FeatureGenerator>>, min_rows: usize) -> Self {
        Self {
            generators,
            min_rows,
        }
    }

    /// Registered generator names.
    #[must_use]
    pub fn generator_names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    /// Runs every generator on the rayon pool and merges the results.
    #[must_use]
    pub fn run(
        &self,
        base: &OhlcvTable,
        coarser: &[OhlcvTable],
        token: Option<&CancellationToken>,
    ) -> MergedCandidates {
        let input = GeneratorInput::new(base, coarser, self.min_rows);
        let outputs: Vec<GeneratorOutput> = self
            .generators
            .par_iter()
            .map(|generator| run_one(generator.as_ref(), &input, token))
            .collect();

        for output in &outputs {
            let outcome = &output.outcome;
            match outcome.status {
                GeneratorStatus::Succeeded => tracing::debug!(
                    generator = %outcome.generator,
                    columns = outcome.columns.len(),
                    "generator succeeded"
                ),
                _ => tracing::warn!(
                    generator = %outcome.generator,
                    status = outcome.status.as_str(),
                    columns = outcome.columns.len(),
                    diagnostics = outcome.diagnostics.len(),
                    "generator did not fully succeed"
                ),
            }
        }

        let cancelled = outputs
            .iter()
            .any(|o| o.outcome.status == GeneratorStatus::Skipped);
        let (columns, outcomes) = merge(outputs);
        MergedCandidates {
            columns,
            outcomes,
            cancelled,
        }
    }
}

fn run_one(
    generator: &dyn FeatureGenerator,
    input: &GeneratorInput<'_>,
    token: Option<&CancellationToken>,
) -> GeneratorOutput {
    if token.is_some_and(CancellationToken::is_cancelled) {
        return GeneratorOutput {
            columns: Vec::new(),
            outcome: GeneratorOutcome::skipped(
                generator.name(),
                generator.family(),
                "cancelled before start",
            ),
        };
    }

    let started = Instant::now();
    let result = catch_unwind(AssertUnwindSafe(|| generator.generate(input)));
    tracing::debug!(
        generator = generator.name(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generator finished"
    );

    result.unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        GeneratorOutput {
            columns: Vec::new(),
            outcome: GeneratorOutcome::failed(
                generator.name(),
                generator.family(),
                &format!("generator panicked: {reason}"),
            ),
        }
    })
}

/// Merges outputs in their given order.
///
/// A name produced by more than one generator becomes `<family>_<name>` for
/// every producer; a name that still collides gets `_2`, `_3`, ... appended.
/// Outcome column lists are rewritten to the final names.
fn merge(outputs: Vec<GeneratorOutput>) -> (Vec<CandidateColumn>, Vec<GeneratorOutcome>) {
    let mut producers: HashMap<&str, usize> = HashMap::new();
    for output in &outputs {
        for (name, _) in &output.columns {
            *producers.entry(name.as_str()).or_default() += 1;
        }
    }
    let shared: HashSet<String> = producers
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect();

    // unique names keep their slot before any renamed column is placed
    let mut used: HashSet<String> = outputs
        .iter()
        .flat_map(|o| o.columns.iter().map(|(n, _)| n))
        .filter(|n| !shared.contains(*n))
        .cloned()
        .collect();

    let total = outputs.iter().map(|o| o.columns.len()).sum();
    let mut columns = Vec::with_capacity(total);
    let mut outcomes = Vec::with_capacity(outputs.len());

    for output in outputs {
        let GeneratorOutput {
            columns: produced,
            mut outcome,
        } = output;
        let mut names = Vec::with_capacity(produced.len());
        for (name, values) in produced {
            let final_name = if shared.contains(&name) {
                let prefixed = format!("{}_{name}", outcome.family.as_str());
                let mut candidate = prefixed.clone();
                let mut suffix = 2;
                while used.contains(&candidate) {
                    candidate = format!("{prefixed}_{suffix}");
                    suffix += 1;
                }
                used.insert(candidate.clone());
                tracing::debug!(from = %name, to = %candidate, "renamed colliding column");
                candidate
            } else {
                name
            };
            names.push(final_name.clone());
            columns.push(CandidateColumn::new(
                final_name,
                outcome.generator.clone(),
                outcome.family,
                values,
            ));
        }
        outcome.columns = names;
        outcomes.push(outcome);
    }

    (columns, outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use theta_generators::ColumnSink;
    use theta_types::{Bar, FeatureFamily};

    struct Fixed {
        name: &'static str,
        family: FeatureFamily,
        columns: Vec<&'static str>,
    }

    impl FeatureGenerator for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn family(&self) -> FeatureFamily {
            self.family
        }

        fn generate(&self, input: &GeneratorInput<'_>) -> GeneratorOutput {
            let mut sink = ColumnSink::new(self.name, self.family, input.rows());
            for (k, name) in self.columns.iter().enumerate() {
                sink.push(*name, (0..input.rows()).map(|i| (i + k) as f64).collect());
            }
            sink.finish()
        }
    }

    struct Panics;

    impl FeatureGenerator for Panics {
        fn name(&self) -> &str {
            "panics"
        }

        fn family(&self) -> FeatureFamily {
            FeatureFamily::Proprietary
        }

        fn generate(&self, _input: &GeneratorInput<'_>) -> GeneratorOutput {
            panic!("boom")
        }
    }

    fn table() -> OhlcvTable {
        OhlcvTable::new((0..5).map(|i| Bar::new(i, 1.0, 2.0, 0.5, 1.5, 1.0)).collect())
    }

    fn fixed(name: &'static str, family: FeatureFamily, columns: Vec<&'static str>) -> Arc<dyn FeatureGenerator> {
        Arc::new(Fixed {
            name,
            family,
            columns,
        })
    }

    #[test]
    fn test_collisions_are_prefixed_for_every_producer() {
        let orchestrator = Orchestrator::with_generators(
            vec![
                fixed("technical", FeatureFamily::Technical, vec!["close_ratio", "sma_5"]),
                fixed("cross_timeframe", FeatureFamily::CrossTimeframe, vec!["close_ratio"]),
            ],
            1,
        );
        let merged = orchestrator.run(&table(), &[], None);

        let names: Vec<&str> = merged.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["technical_close_ratio", "sma_5", "cross_timeframe_close_ratio"]
        );
        assert_eq!(merged.outcomes[1].columns, vec!["cross_timeframe_close_ratio"]);
    }

    #[test]
    fn test_prefixed_name_collision_gets_suffix() {
        let orchestrator = Orchestrator::with_generators(
            vec![
                fixed("technical", FeatureFamily::Technical, vec!["x", "technical_x"]),
                fixed("other", FeatureFamily::Technical, vec!["x"]),
            ],
            1,
        );
        let merged = orchestrator.run(&table(), &[], None);

        let names: Vec<&str> = merged.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["technical_x_2", "technical_x", "technical_x_3"]);
    }

    #[test]
    fn test_panicking_generator_is_isolated() {
        let orchestrator = Orchestrator::with_generators(
            vec![
                fixed("technical", FeatureFamily::Technical, vec!["a"]),
                Arc::new(Panics),
            ],
            1,
        );
        let merged = orchestrator.run(&table(), &[], None);

        assert_eq!(merged.columns.len(), 1);
        assert_eq!(merged.outcomes[1].status, GeneratorStatus::Failed);
        assert!(merged.outcomes[1].diagnostics[0].message.contains("boom"));
        assert!(merged.has_output());
    }

    #[test]
    fn test_cancelled_token_skips_everything() {
        let orchestrator = Orchestrator::with_generators(
            vec![fixed("technical", FeatureFamily::Technical, vec!["a"])],
            1,
        );
        let token = CancellationToken::new();
        token.cancel();
        let merged = orchestrator.run(&table(), &[], Some(&token));

        assert!(merged.cancelled);
        assert!(merged.columns.is_empty());
        assert_eq!(merged.outcomes[0].status, GeneratorStatus::Skipped);
    }
}
