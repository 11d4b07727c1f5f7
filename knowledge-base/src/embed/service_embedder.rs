//! Embedding provider backed by the shared [`EmbeddingService`].

use std::{future::Future, pin::Pin, sync::Arc};

use embedding_service::EmbeddingService;

use crate::{EmbeddingsProvider, KbError};

/// Adapts [`EmbeddingService`] (Ollama, OpenAI or hashing) to [`EmbeddingsProvider`].
#[derive(Clone)]
pub struct ServiceEmbedder {
    svc: Arc<EmbeddingService>,
}

impl ServiceEmbedder {
    pub fn new(svc: Arc<EmbeddingService>) -> Self {
        Self { svc }
    }

    pub fn service(&self) -> &Arc<EmbeddingService> {
        &self.svc
    }
}

impl EmbeddingsProvider for ServiceEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, KbError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.svc.embed(text).await?) })
    }
}
