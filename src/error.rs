use thiserror::Error;

/// Failure modes of the recommendation core. Data sparsity in postings is
/// never an error; the scorer resolves it with neutral defaults instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("factor weights must sum to 1.0, got {sum:.4}")]
    InvalidWeights { sum: f64 },
    #[error("learning resource catalog is malformed: {0}")]
    ResourceCatalog(#[from] serde_json::Error),
}
