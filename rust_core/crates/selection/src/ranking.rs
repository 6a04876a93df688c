//! Normalization, weighted combination and ranking.

use crate::methods::MethodScores;
use crate::stats::SPREAD_EPS;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use theta_types::{SelectionMethod, SelectorConfig};

/// Min-max normalizes the valid scores of one method across columns.
///
/// Invalid entries stay `None`; when every valid score is equal they all map to 1.0.
#[must_use]
pub fn normalize(scores: &MethodScores) -> Vec<Option<f64>> {
    let valid = scores
        .iter()
        .filter_map(|s| s.as_ref().ok().copied().filter(|v| v.is_finite()));
    let (lo, hi) = valid.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = hi - lo;

    scores
        .iter()
        .map(|s| match s {
            Ok(v) if v.is_finite() => Some(if span > SPREAD_EPS {
                ((v - lo) / span).clamp(0.0, 1.0)
            } else {
                1.0
            }),
            _ => None,
        })
        .collect()
}

/// Weighted average over the methods that produced a score.
///
/// Returns `None` when no method scored the column or every available
/// weight is zero.
#[must_use]
pub fn combine(normalized: &BTreeMap<SelectionMethod, f64>, config: &SelectorConfig) -> Option<f64> {
    let (sum, weight) = normalized
        .iter()
        .fold((0.0, 0.0), |(sum, weight), (method, score)| {
            let w = config.weight(*method);
            (sum + w * score, weight + w)
        });
    if weight > 0.0 { Some(sum / weight) } else { None }
}

/// Orders by combined score descending, then name ascending; unscored last.
#[must_use]
pub fn rank_order(names: &[&str], combined: &[Option<f64>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..names.len()).collect();
    order.sort_by(|&a, &b| {
        let by_score = match (combined[a], combined[b]) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_score.then_with(|| names[a].cmp(names[b]))
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_min_max() {
        let scores: MethodScores = vec![Ok(2.0), Err("x".into()), Ok(4.0), Ok(3.0)];
        assert_eq!(normalize(&scores), vec![Some(0.0), None, Some(1.0), Some(0.5)]);
    }

    #[test]
    fn test_normalize_all_equal_is_one() {
        let scores: MethodScores = vec![Ok(0.3), Ok(0.3)];
        assert_eq!(normalize(&scores), vec![Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_combine_uses_weights() {
        let mut config = SelectorConfig::default();
        config.weights.insert(SelectionMethod::Variance, 3.0);
        let normalized = BTreeMap::from([
            (SelectionMethod::Correlation, 1.0),
            (SelectionMethod::Variance, 0.0),
        ]);
        assert_eq!(combine(&normalized, &config), Some(0.25));
        assert_eq!(combine(&BTreeMap::new(), &config), None);
    }

    #[test]
    fn test_rank_ties_by_name_and_unscored_last() {
        let names = ["b", "a", "z", "c"];
        let combined = [Some(0.5), Some(0.5), None, Some(0.9)];
        assert_eq!(rank_order(&names, &combined), vec![3, 1, 0, 2]);
    }
}
