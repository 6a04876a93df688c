//! Theta Pipeline
//!
//! Facade of the Theta feature engine. Validates the input and configuration,
//! fans the generators out on the rayon pool, merges their columns without
//! name collisions, and prunes the merged set with the multi-method selector.
//!
//! ```text
//! PipelineInput ─▶ validate ─▶ Orchestrator ─▶ Selector ─▶ FeatureTable
//!                                   │              │
//!                                   └──▶ PipelineReport ◀┘
//! ```

#![deny(clippy::all)]
#![deny(missing_docs)]

pub mod cancel;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod validation;

pub use cancel::CancellationToken;
pub use error::{ErrorResult, PipelineError};
pub use orchestrator::{MergedCandidates, Orchestrator};
pub use pipeline::{
    FeaturePipeline, PipelineInput, PipelineOutput, run_pipeline, run_pipeline_from_json,
};
pub use report::PipelineReport;
pub use table::FeatureTable;
pub use validation::validate_config;
