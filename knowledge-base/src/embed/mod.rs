use crate::{errors::KbError, similarity::cosine};
use std::{future::Future, pin::Pin};

/// Provider interface for embedding generation and vector comparison.
///
/// Implement this trait to plug in another backend, or a fixed table of
/// vectors in tests. `similarity` defaults to cosine.
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, KbError>> + Send + 'a>>;

    /// Similarity score between two vectors; higher is closer.
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine(a, b)
    }
}

pub mod service_embedder;
