mod common;

use common::{START_NS, hourly_table};
use generators::valid_table;
use proptest::prelude::*;
use theta_generators::{
    CrossTimeframeGenerator, FeatureGenerator, GeneratorInput, GeneratorStatus, build_generators,
};
use theta_types::{
    Bar, CrossTimeframeConfig, DiagnosticKind, FeatureFamily, OhlcvTable, PipelineConfig, Timeframe,
};

fn has_failure(diags: &[theta_types::Diagnostic]) -> bool {
    diags.iter().any(|d| d.kind == DiagnosticKind::GeneratorFailure)
}

#[test]
fn test_all_generators_on_200_rows() {
    let table = hourly_table(200);
    let config = PipelineConfig::default();
    let input = GeneratorInput::new(&table, &[], config.min_rows);

    for generator in build_generators(&config) {
        let output = generator.generate(&input);
        assert!(
            !has_failure(&output.outcome.diagnostics),
            "{} failed: {:?}",
            generator.name(),
            output.outcome.diagnostics
        );
        assert!(output.outcome.contributed(), "{} produced nothing", generator.name());
        assert_eq!(output.outcome.family, generator.family());
        for (name, values) in &output.columns {
            assert_eq!(values.len(), 200, "{name}");
            assert!(values.iter().all(|v| !v.is_infinite()), "{name}");
            assert!(values.iter().any(|v| v.is_finite()), "{name}");
        }
    }
}

#[test]
fn test_generators_are_deterministic() {
    let table = hourly_table(150);
    let config = PipelineConfig::default();
    let input = GeneratorInput::new(&table, &[], config.min_rows);

    for generator in build_generators(&config) {
        let first = generator.generate(&input);
        let second = generator.generate(&input);
        assert_eq!(first.columns.len(), second.columns.len());
        for ((n1, v1), (n2, v2)) in first.columns.iter().zip(&second.columns) {
            assert_eq!(n1, n2);
            let bits1: Vec<u64> = v1.iter().map(|v| v.to_bits()).collect();
            let bits2: Vec<u64> = v2.iter().map(|v| v.to_bits()).collect();
            assert_eq!(bits1, bits2, "{n1}");
        }
        assert_eq!(first.outcome, second.outcome);
    }
}

#[test]
fn test_short_input_gates_windowed_generators() {
    let table = hourly_table(10);
    let config = PipelineConfig::default();
    let input = GeneratorInput::new(&table, &[], config.min_rows);

    for generator in build_generators(&config) {
        let output = generator.generate(&input);
        assert!(!has_failure(&output.outcome.diagnostics), "{}", generator.name());
        if generator.is_windowed() {
            assert!(output.columns.is_empty(), "{}", generator.name());
            assert_eq!(output.outcome.status, GeneratorStatus::PartiallySucceeded);
            assert!(!output.outcome.diagnostics.is_empty());
        } else {
            assert_eq!(generator.family(), FeatureFamily::Temporal);
            assert!(!output.columns.is_empty());
        }
    }
}

/// Any look-ahead would let the coarse close equal a later base close.
#[test]
fn test_cross_timeframe_never_sees_unfinished_bars() {
    let table = hourly_table(120);
    let closes = table.closes();
    let generator = CrossTimeframeGenerator::new(CrossTimeframeConfig {
        resample_to: vec![Timeframe::H4],
        ..CrossTimeframeConfig::default()
    });
    let output = generator.generate(&GeneratorInput::new(&table, &[], 30));

    let ratio = &output
        .columns
        .iter()
        .find(|(n, _)| n == "h4_close_ratio")
        .expect("ratio column")
        .1;

    for t in 0..closes.len() {
        if t < 3 {
            assert!(ratio[t].is_nan());
            continue;
        }
        let seen = closes[t] / ratio[t];
        let used = closes
            .iter()
            .position(|c| (c - seen).abs() <= 1e-9 * c.abs())
            .expect("coarse close comes from a base close");
        assert!(used <= t, "row {t} used the close of row {used}");
        // last completed H4 bucket ends at base row 4k+3 <= t
        assert_eq!(used, 4 * ((t + 1) / 4) - 1);
    }
}

/// Daily bars carrying no duration must not leak the day's final close into
/// the hours before it.
#[test]
fn test_supplied_table_without_timeframe_never_sees_unfinished_bars() {
    let table = hourly_table(120);
    let closes = table.closes();
    let day = Timeframe::D1.to_nanos();
    let daily = OhlcvTable::new(
        closes
            .chunks(24)
            .enumerate()
            .map(|(d, hours)| {
                let open = hours[0];
                let close = hours[hours.len() - 1];
                Bar::new(
                    START_NS + d as i64 * day,
                    open,
                    open.max(close),
                    open.min(close),
                    close,
                    1.0,
                )
            })
            .collect(),
    );
    let generator = CrossTimeframeGenerator::new(CrossTimeframeConfig {
        resample_to: Vec::new(),
        ..CrossTimeframeConfig::default()
    });
    let coarser = [daily];
    let output = generator.generate(&GeneratorInput::new(&table, &coarser, 30));

    let ratio = &output
        .columns
        .iter()
        .find(|(n, _)| n == "tf1_close_ratio")
        .expect("ratio column")
        .1;

    for t in 0..closes.len() {
        if t < 23 {
            assert!(ratio[t].is_nan(), "row {t} saw an unfinished day");
            continue;
        }
        let seen = closes[t] / ratio[t];
        let used = closes
            .iter()
            .position(|c| (c - seen).abs() <= 1e-9 * c.abs())
            .expect("coarse close comes from a base close");
        assert!(used <= t, "row {t} used the close of row {used}");
        // the final day (rows 96..120) has no successor and never completes
        assert_eq!(used, (24 * ((t + 1) / 24) - 1).min(95));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_columns_align_with_rows(table in valid_table(80)) {
        let config = PipelineConfig::default();
        let input = GeneratorInput::new(&table, &[], config.min_rows);

        for generator in build_generators(&config) {
            let output = generator.generate(&input);
            prop_assert!(!has_failure(&output.outcome.diagnostics));
            prop_assert_eq!(output.columns.len(), output.outcome.columns.len());
            for (name, values) in &output.columns {
                prop_assert_eq!(values.len(), 80, "{}", name);
                prop_assert!(values.iter().all(|v| !v.is_infinite()));
            }
        }
    }
}
