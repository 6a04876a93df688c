//! Random-forest impurity importance.
//!
//! Regression trees on bootstrap samples; each split considers a random
//! subset of columns. Importance is the total squared-error decrease a column
//! achieves across all trees, normalized to sum to 1.

use super::{Design, MethodScores, ScoringContext, ScoringMethod, fail_all};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use theta_types::{SelectionMethod, SelectorConfig};

/// Forest hyper-parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    /// Number of trees
    pub trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,
    /// Columns tried per split (None = ceil(sqrt(columns)))
    pub max_features: Option<usize>,
    /// Base seed; tree `i` uses `seed + i`
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 32,
            max_depth: 4,
            min_samples_leaf: 5,
            max_features: None,
            seed: 42,
        }
    }
}

/// Scores columns by forest importance.
#[derive(Debug, Clone, Copy)]
pub struct ForestScorer {
    params: ForestParams,
}

impl ForestScorer {
    /// Creates a scorer.
    #[must_use]
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    /// Reads the `forest_*` selector options.
    #[must_use]
    pub fn from_config(config: &SelectorConfig) -> Self {
        Self::new(ForestParams {
            trees: config.forest_trees,
            max_depth: config.forest_max_depth,
            min_samples_leaf: config.forest_min_samples_leaf,
            max_features: config.forest_max_features,
            seed: config.forest_seed,
        })
    }
}

struct TreeBuilder<'a> {
    columns: &'a [&'a [f64]],
    target: &'a [f64],
    params: &'a ForestParams,
    max_features: usize,
    importance: Vec<f64>,
    rng: ChaCha8Rng,
}

struct Split {
    column: usize,
    threshold: f64,
    decrease: f64,
}

fn sse(target: &[f64], rows: &[usize]) -> f64 {
    let n = rows.len() as f64;
    let (sum, sq) = rows
        .iter()
        .fold((0.0, 0.0), |(s, q), &i| (s + target[i], q + target[i] * target[i]));
    (sq - sum * sum / n).max(0.0)
}

impl TreeBuilder<'_> {
    fn grow(&mut self, rows: Vec<usize>, depth: usize) {
        let n = rows.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        if depth >= self.params.max_depth || n < 2 * min_leaf {
            return;
        }
        let parent = sse(self.target, &rows);
        if parent <= 1e-12 {
            return;
        }

        let Some(split) = self.best_split(&rows, parent, min_leaf) else {
            return;
        };
        self.importance[split.column] += split.decrease;

        let values = self.columns[split.column];
        let (left, right): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&i| values[i] <= split.threshold);
        self.grow(left, depth + 1);
        self.grow(right, depth + 1);
    }

    fn best_split(&mut self, rows: &[usize], parent: f64, min_leaf: usize) -> Option<Split> {
        let n = rows.len();
        let candidates = sample(&mut self.rng, self.columns.len(), self.max_features);
        let mut best: Option<Split> = None;
        let mut order: Vec<(f64, f64)> = Vec::with_capacity(n);

        for column in candidates {
            let values = self.columns[column];
            order.clear();
            order.extend(rows.iter().map(|&i| (values[i], self.target[i])));
            order.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (total, total_sq) = order
                .iter()
                .fold((0.0, 0.0), |(s, q), (_, y)| (s + y, q + y * y));
            let (mut left, mut left_sq) = (0.0, 0.0);
            for k in 1..n {
                let y = order[k - 1].1;
                left += y;
                left_sq += y * y;
                if k < min_leaf || n - k < min_leaf || order[k].0 <= order[k - 1].0 {
                    continue;
                }
                let (nl, nr) = (k as f64, (n - k) as f64);
                let right = total - left;
                let sse_left = (left_sq - left * left / nl).max(0.0);
                let sse_right = (total_sq - left_sq - right * right / nr).max(0.0);
                let decrease = parent - sse_left - sse_right;
                if decrease > 1e-12 && best.as_ref().is_none_or(|b| decrease > b.decrease) {
                    best = Some(Split {
                        column,
                        threshold: 0.5 * (order[k - 1].0 + order[k].0),
                        decrease,
                    });
                }
            }
        }
        best
    }
}

/// Importance per column, summing to 1 (all zero when no split was found).
///
/// Trees are fit in parallel; the result only depends on `params.seed`.
#[must_use]
pub fn forest_importance(columns: &[&[f64]], target: &[f64], params: &ForestParams) -> Vec<f64> {
    let p = columns.len();
    let n = target.len();
    if p == 0 || n == 0 || params.trees == 0 {
        return vec![0.0; p];
    }
    let default_features = (p as f64).sqrt().ceil() as usize;
    let max_features = params.max_features.unwrap_or(default_features).clamp(1, p);

    let per_tree: Vec<Vec<f64>> = (0..params.trees)
        .into_par_iter()
        .map(|t| {
            let mut rng = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(t as u64));
            let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut builder = TreeBuilder {
                columns,
                target,
                params,
                max_features,
                importance: vec![0.0; p],
                rng,
            };
            builder.grow(rows, 0);
            builder.importance
        })
        .collect();

    let mut importance = vec![0.0; p];
    for tree in &per_tree {
        for (acc, v) in importance.iter_mut().zip(tree) {
            *acc += v;
        }
    }
    let sum: f64 = importance.iter().sum();
    if sum > 0.0 {
        for v in &mut importance {
            *v /= sum;
        }
    }
    importance
}

impl ScoringMethod for ForestScorer {
    fn method(&self) -> SelectionMethod {
        SelectionMethod::EnsembleImportance
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> MethodScores {
        let design = match Design::build(ctx) {
            Ok(design) => design,
            Err(reason) => return fail_all(ctx.columns.len(), &reason),
        };

        let usable: Vec<(usize, &[f64])> = design
            .features
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().ok().map(|v| (i, v.as_slice())))
            .collect();
        let matrix: Vec<&[f64]> = usable.iter().map(|(_, v)| *v).collect();
        let importance = forest_importance(&matrix, &design.target, &self.params);

        let mut scores: MethodScores = design
            .features
            .iter()
            .map(|f| match f {
                Ok(_) => Ok(0.0),
                Err(reason) => Err(reason.clone()),
            })
            .collect();
        for ((i, _), imp) in usable.iter().zip(importance) {
            scores[*i] = Ok(imp);
        }
        scores
    }
}
