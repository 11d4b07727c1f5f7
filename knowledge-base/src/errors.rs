//! Unified error types for the crate.

use embedding_service::EmbeddingError;
use thiserror::Error;

/// Top-level error for knowledge-base operations.
#[derive(Debug, Error)]
pub enum KbError {
    /// Embedding backend failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// I/O error while reading a corpus file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Corpus JSON could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid configuration or corpus content.
    #[error("config error: {0}")]
    Config(String),

    /// Document vectors do not share one dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },
}

pub type Result<T> = std::result::Result<T, KbError>;
