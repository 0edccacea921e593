//! Error types for the jalign core library.

/// Top-level error enum for the jalign core library.
///
/// Only genuinely exceptional conditions surface here (I/O, serialization,
/// subprocess spawning).  Malformed samples are not errors: the split and
/// alignment stages report them as `None`/reject values so per-sample
/// drivers can skip and continue.
#[derive(Debug, thiserror::Error)]
pub enum JalignError {
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type JalignResult<T> = Result<T, JalignError>;
