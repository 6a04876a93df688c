mod common;

use common::{START_NS, hourly_table, valid_table};
use proptest::prelude::*;
use theta_data::resample;
use theta_generators::GeneratorStatus;
use theta_pipeline::{
    CancellationToken, ErrorResult, FeaturePipeline, PipelineError, PipelineInput,
    PipelineReport, run_pipeline, run_pipeline_from_json,
};
use theta_selection::SelectorState;
use theta_types::{Bar, DiagnosticKind, OhlcvTable, PipelineConfig, Timeframe};

fn config_with_target(n: usize) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.selector.target_count = n;
    config
}

#[test]
fn test_200_rows_selects_50_columns() {
    let input = PipelineInput::new(hourly_table(200));
    let output = run_pipeline(&input, config_with_target(50)).unwrap();

    assert_eq!(output.features.width(), 50);
    assert_eq!(output.features.rows(), 200);
    for column in &output.features.columns {
        assert_eq!(column.len(), 200, "{}", column.name);
    }

    let report = &output.report;
    assert!(report.diagnostics_of(DiagnosticKind::GeneratorFailure).is_empty());
    assert_eq!(report.rows, 200);
    assert!(report.candidate_count > 50);
    assert_eq!(report.selected, output.features.names());
    assert_eq!(report.selector_state, Some(SelectorState::Pruned));
    assert!(!report.cancelled);
    assert_eq!(report.generators.len(), 5);
    assert!(report.generators.iter().all(|g| g.contributed()));

    let selected: Vec<_> = report.scores.iter().filter(|s| s.selected).collect();
    assert_eq!(selected.len(), 50);
    assert!(selected.iter().all(|s| s.rank <= 50));
}

#[test]
fn test_ten_rows_still_returns_a_table() {
    let input = PipelineInput::new(hourly_table(10));
    let output = run_pipeline(&input, PipelineConfig::default()).unwrap();

    assert_eq!(output.features.rows(), 10);
    assert!(!output.features.is_empty());

    let report = &output.report;
    for name in ["technical", "statistical", "cross_timeframe", "proprietary"] {
        let outcome = report.generator(name).unwrap();
        assert!(outcome.columns.is_empty(), "{name}");
        assert!(
            outcome
                .diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::GeneratorWarning),
            "{name}"
        );
    }
    // calendar columns need no history; decomposition is gated
    let temporal = report.generator("temporal").unwrap();
    assert!(temporal.contributed());
    assert_eq!(temporal.status, GeneratorStatus::PartiallySucceeded);
    assert!(report.diagnostics_of(DiagnosticKind::GeneratorFailure).is_empty());
}

#[test]
fn test_constant_columns_never_reach_scores_or_features() {
    // 200 hours of January 2024: year and month never change
    let output = run_pipeline(
        &PipelineInput::new(hourly_table(200)),
        config_with_target(500),
    )
    .unwrap();
    let report = &output.report;

    for constant in ["year", "month"] {
        assert!(report.dropped_constant.iter().any(|c| c == constant), "{constant}");
        assert!(report.scores.iter().all(|s| s.column != constant));
        assert!(output.features.column(constant).is_none());
    }
    assert_eq!(
        output.features.width(),
        report.candidate_count - report.dropped_constant.len()
    );
}

#[test]
fn test_feature_values_match_candidates() {
    let table = hourly_table(120);
    let output = run_pipeline(&PipelineInput::new(table.clone()), config_with_target(500)).unwrap();

    let hour = output.features.column("hour").unwrap();
    let expected: Vec<f64> = (0..120).map(|i| (i % 24) as f64).collect();
    assert_eq!(&*hour.values, expected.as_slice());
    assert_eq!(&*output.features.timestamps, table.timestamps().as_slice());
}

#[test]
fn test_report_plain_roundtrip_is_exact() {
    let output = run_pipeline(
        &PipelineInput::new(hourly_table(150)),
        config_with_target(20),
    )
    .unwrap();
    let report = output.report;

    let plain = report.to_plain().unwrap();
    assert_eq!(PipelineReport::from_plain(plain).unwrap(), report);

    let json = report.to_json().unwrap();
    assert_eq!(PipelineReport::from_json(&json).unwrap(), report);
}

#[test]
fn test_runs_are_deterministic() {
    let pipeline = FeaturePipeline::new(config_with_target(30)).unwrap();
    let input = PipelineInput::new(hourly_table(160));

    let first = pipeline.run(&input).unwrap();
    let second = pipeline.run(&input).unwrap();
    assert_eq!(first.report, second.report);
    assert_eq!(first.features.names(), second.features.names());
}

#[test]
fn test_explicit_target() {
    let table = hourly_table(150);
    let closes = table.closes();
    let target: Vec<f64> = closes
        .iter()
        .zip(closes.iter().skip(2))
        .map(|(now, later)| later - now)
        .chain([f64::NAN, f64::NAN])
        .collect();

    let pipeline = FeaturePipeline::new(config_with_target(10)).unwrap();
    let output = pipeline
        .run_with_target(&PipelineInput::new(table), &target)
        .unwrap();
    assert_eq!(output.features.width(), 10);
}

#[test]
fn test_target_length_mismatch_is_input_error() {
    let pipeline = FeaturePipeline::new(PipelineConfig::default()).unwrap();
    let err = pipeline
        .run_with_target(&PipelineInput::new(hourly_table(50)), &[0.0; 49])
        .unwrap_err();

    assert_eq!(err.error_category(), "input");
    let result = ErrorResult::from(&err);
    assert_eq!(result.details["expected"], 50);
    assert_eq!(result.details["actual"], 49);
}

#[test]
fn test_invalid_input_tables_are_rejected() {
    let pipeline = FeaturePipeline::new(PipelineConfig::default()).unwrap();

    let err = pipeline
        .run(&PipelineInput::new(OhlcvTable::new(Vec::new())))
        .unwrap_err();
    assert!(matches!(err, PipelineError::InputValidation(_)));

    let step = Timeframe::H4.to_nanos();
    let unordered = OhlcvTable::with_timeframe(
        Timeframe::H4,
        vec![
            Bar::with_timeframe(START_NS + step, Timeframe::H4, 1.0, 1.1, 0.9, 1.0, 1.0),
            Bar::with_timeframe(START_NS, Timeframe::H4, 1.0, 1.1, 0.9, 1.0, 1.0),
        ],
    );
    let input = PipelineInput::new(hourly_table(60)).with_coarser(unordered);
    assert_eq!(pipeline.run(&input).unwrap_err().error_category(), "input");
}

#[test]
fn test_supplied_coarser_table() {
    let base = hourly_table(200);
    let h4 = resample(&base, Timeframe::H4);
    let mut config = config_with_target(500);
    config.cross_timeframe.resample_to = vec![Timeframe::H4];

    let output = run_pipeline(&PipelineInput::new(base).with_coarser(h4), config).unwrap();
    let outcome = output.report.generator("cross_timeframe").unwrap();
    assert!(outcome.contributed());
    assert!(outcome.columns.iter().all(|c| c.starts_with("h4_")));
}

#[test]
fn test_config_errors() {
    let input = PipelineInput::new(hourly_table(40));

    let err = run_pipeline_from_json("{ not json", &input).unwrap_err();
    assert!(matches!(err, PipelineError::ConfigParse(_)));
    assert_eq!(err.error_category(), "config");

    let err = run_pipeline_from_json(r#"{"selector": {"target_count": 0}}"#, &input).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));

    let err = run_pipeline_from_json(r#"{"selector": {"methods": []}}"#, &input).unwrap_err();
    assert!(err.is_config_error());

    let mut config = PipelineConfig::default();
    config.technical.atr.periods = vec![0];
    assert!(matches!(
        FeaturePipeline::new(config),
        Err(PipelineError::Config(_))
    ));
}

#[test]
fn test_json_config_defaults_fill_missing_keys() {
    let output = run_pipeline_from_json(
        r#"{"selector": {"target_count": 5, "methods": ["correlation", "variance"]}}"#,
        &PipelineInput::new(hourly_table(100)),
    )
    .unwrap();
    assert_eq!(output.features.width(), 5);
    for score in &output.report.scores {
        assert!(score.raw_scores.keys().all(|m| {
            matches!(
                m,
                theta_types::SelectionMethod::Correlation | theta_types::SelectionMethod::Variance
            )
        }));
    }
}

#[test]
fn test_no_generators_is_runtime_error() {
    let mut config = PipelineConfig::default();
    config.technical.enabled = false;
    config.statistical.enabled = false;
    config.temporal.enabled = false;
    config.cross_timeframe.enabled = false;
    config.proprietary.enabled = false;

    let err = run_pipeline(&PipelineInput::new(hourly_table(50)), config).unwrap_err();
    assert!(matches!(err, PipelineError::NoCandidates(_)));
    assert_eq!(err.error_category(), "runtime");
}

#[test]
fn test_cancelled_run_returns_empty_table() {
    let pipeline = FeaturePipeline::new(PipelineConfig::default()).unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let output = pipeline
        .run_with_cancellation(&PipelineInput::new(hourly_table(80)), &token)
        .unwrap();
    assert!(output.features.is_empty());
    assert_eq!(output.features.rows(), 80);
    assert!(output.report.cancelled);
    assert_eq!(output.report.selector_state, None);
    assert_eq!(
        output.report.count_status(GeneratorStatus::Skipped),
        output.report.generators.len()
    );
}

#[test]
fn test_uncancelled_token_is_a_normal_run() {
    let pipeline = FeaturePipeline::new(config_with_target(15)).unwrap();
    let input = PipelineInput::new(hourly_table(120));
    let output = pipeline
        .run_with_cancellation(&input, &CancellationToken::new())
        .unwrap();
    assert!(!output.report.cancelled);
    assert_eq!(output.report, pipeline.run(&input).unwrap().report);
}

#[test]
fn test_arrow_export() {
    let output = run_pipeline(
        &PipelineInput::new(hourly_table(100)),
        config_with_target(12),
    )
    .unwrap();
    let batch = output.features.to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 100);
    assert_eq!(batch.num_columns(), 13);
    assert_eq!(batch.schema().field(0).name(), "timestamp");
    assert_eq!(batch.schema().field(1).name(), &output.report.selected[0]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    #[test]
    fn prop_output_rows_and_width(table in valid_table(60), n in 1usize..40) {
        let output = run_pipeline(&PipelineInput::new(table), config_with_target(n)).unwrap();
        let report = &output.report;
        let survivors = report.candidate_count - report.dropped_constant.len();

        prop_assert_eq!(output.features.rows(), 60);
        prop_assert_eq!(output.features.width(), n.min(survivors));
        prop_assert_eq!(report.scores.len(), survivors);
        for column in &output.features.columns {
            prop_assert_eq!(column.len(), 60);
        }
    }
}
