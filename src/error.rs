//! Pipeline error taxonomy. Degenerate vocabularies and too-small batches are
//! recovered inside the pipeline and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("empty batch: no log lines to score")]
    EmptyBatch,

    #[error("contamination must be in (0, 0.5], got {0}")]
    Contamination(f64),

    #[error("max_features must be greater than zero")]
    MaxFeatures,

    #[error("frozen model expects {expected} feature columns, batch produced {actual}")]
    ModelMismatch { expected: usize, actual: usize },
}
