//! Theta Selection
//!
//! Prunes the merged candidate columns down to a target count.
//!
//! # Pipeline
//! 1. Variance filter: drop constant or near-empty columns
//! 2. Score survivors with the enabled methods (correlation, mutual
//!    information, Lasso, random-forest importance, range-normalized variance)
//! 3. Min-max normalize per method and combine with configurable weights
//! 4. Rank (score descending, name ascending, unscored last) and keep the top N
//!
//! A method failing for a column is a diagnostic, not an error. The run only
//! fails when no surviving column could be scored at all.

#![deny(clippy::all)]

pub mod error;
pub mod filter;
pub mod methods;
pub mod ranking;
pub mod score;
pub mod selector;
pub mod state;
pub mod target;

mod stats;

pub use error::SelectionError;
pub use filter::variance_filter;
pub use methods::{
    CorrelationScorer, ForestScorer, LassoScorer, MethodScores, MutualInfoScorer,
    RangeVarianceScorer, ScoringContext, ScoringMethod, build_methods,
};
pub use methods::forest::ForestParams;
pub use score::SelectionScore;
pub use selector::{SelectionOutcome, Selector, validate_selector_config};
pub use state::SelectorState;
pub use target::forward_log_return;
