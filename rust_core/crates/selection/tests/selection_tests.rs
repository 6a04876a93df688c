use proptest::prelude::*;
use theta_selection::{SelectionScore, Selector, SelectorState, forward_log_return};
use theta_types::{CandidateColumn, DiagnosticKind, FeatureFamily, SelectionMethod, SelectorConfig};

fn column(name: &str, values: Vec<f64>) -> CandidateColumn {
    CandidateColumn::new(name, "synthetic", FeatureFamily::Statistical, values)
}

fn closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            100.0 + 3.0 * (0.11 * x).sin() + 0.7 * (0.83 * x).sin() + 0.2 * (2.9 * x).cos()
        })
        .collect()
}

/// Target plus a handful of columns with decreasing relation to it.
fn candidates(n: usize) -> (Vec<CandidateColumn>, Vec<f64>) {
    let target = forward_log_return(&closes(n), 1);
    let leak: Vec<f64> = target
        .iter()
        .enumerate()
        .map(|(i, t)| t + 1e-5 * ((i * 31) % 7) as f64)
        .collect();
    let cols = vec![
        column("noise_a", (0..n).map(|i| ((i * 7919) % 113) as f64).collect()),
        column("constant", vec![1.5; n]),
        column("leak", leak),
        column("noise_b", (0..n).map(|i| ((i * 104_729) % 97) as f64).collect()),
        column("slow_cycle", (0..n).map(|i| (i as f64 * 0.01).sin()).collect()),
    ];
    (cols, target)
}

#[test]
fn test_informative_column_ranks_first() {
    let (columns, target) = candidates(200);
    let selector = Selector::new(SelectorConfig::default()).unwrap();
    let outcome = selector.select(&columns, &target).unwrap();

    assert_eq!(outcome.state, SelectorState::Pruned);
    assert_eq!(outcome.dropped, vec!["constant"]);
    assert_eq!(outcome.scores[0].column, "leak");
    assert_eq!(outcome.scores.len(), 4);
    assert_eq!(outcome.selected.len(), 4);
    assert_eq!(columns[outcome.selected[0]].name, "leak");

    let leak = &outcome.scores[0];
    assert_eq!(leak.scores.len(), SelectionMethod::ALL.len());
    assert!(leak.raw_scores[&SelectionMethod::Correlation] > 0.99);
    assert!(leak.scores.values().all(|s| (0.0..=1.0).contains(s)));
}

#[test]
fn test_constant_column_never_scored() {
    let (columns, target) = candidates(120);
    let outcome = Selector::new(SelectorConfig::default())
        .unwrap()
        .select(&columns, &target)
        .unwrap();
    assert!(outcome.scores.iter().all(|s| s.column != "constant"));
    assert!(outcome.diagnostics.iter().all(|d| !d.columns.contains(&"constant".to_string())));
}

#[test]
fn test_target_count_caps_output() {
    let (columns, target) = candidates(150);
    let config = SelectorConfig {
        target_count: 2,
        ..SelectorConfig::default()
    };
    let outcome = Selector::new(config).unwrap().select(&columns, &target).unwrap();

    assert_eq!(outcome.selected.len(), 2);
    assert_eq!(outcome.scores.iter().filter(|s| s.selected).count(), 2);
    let ranks: Vec<usize> = outcome.scores.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[test]
fn test_selection_is_deterministic() {
    let (columns, target) = candidates(160);
    let selector = Selector::new(SelectorConfig::default()).unwrap();
    let first = selector.select(&columns, &target).unwrap();
    let second = selector.select(&columns, &target).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unsupervised_fallback_records_method_failures() {
    let (columns, _) = candidates(100);
    let target = vec![f64::NAN; 100];
    let outcome = Selector::new(SelectorConfig::default())
        .unwrap()
        .select(&columns, &target)
        .unwrap();

    let failed: Vec<&str> = outcome
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::SelectionMethodFailure)
        .map(|d| d.source.as_str())
        .collect();
    assert_eq!(
        failed,
        vec!["correlation", "mutual_information", "regularized_linear", "ensemble_importance"]
    );
    assert!(outcome.scores.iter().all(|s| s.scores.len() == 1));
    assert_eq!(outcome.selected.len(), 4);
}

#[test]
fn test_score_json_roundtrip_is_exact() {
    let (columns, target) = candidates(120);
    let outcome = Selector::new(SelectorConfig::default())
        .unwrap()
        .select(&columns, &target)
        .unwrap();

    let json = serde_json::to_string(&outcome.scores).unwrap();
    let back: Vec<SelectionScore> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outcome.scores);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_output_size_is_min_of_target_and_survivors(
        data in prop::collection::vec(prop::collection::vec(-10.0f64..10.0, 40), 1..8),
        flat in 0usize..3,
        target_count in 1usize..6,
    ) {
        let mut columns: Vec<CandidateColumn> = data
            .into_iter()
            .enumerate()
            .map(|(i, v)| column(&format!("c{i}"), v))
            .collect();
        for k in 0..flat {
            columns.push(column(&format!("flat{k}"), vec![k as f64; 40]));
        }
        let target: Vec<f64> = (0..40).map(|i| (i as f64 * 0.7).sin()).collect();
        let config = SelectorConfig { target_count, ..SelectorConfig::default() };

        let outcome = Selector::new(config).unwrap().select(&columns, &target).unwrap();
        let survivors = columns.len() - outcome.dropped.len();
        prop_assert_eq!(outcome.selected.len(), target_count.min(survivors));
        prop_assert_eq!(outcome.scores.len(), survivors);
        prop_assert!(outcome.dropped.len() >= flat);
    }
}
