use std::sync::Arc;

use embedding_service::EmbeddingService;
use helpdesk_flow::ConversationEngine;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Conversation engine shared with the other transports.
    pub engine: Arc<ConversationEngine>,
    /// Embedding backend, probed by `/health`.
    pub embeddings: Arc<EmbeddingService>,
}

impl AppState {
    pub fn new(engine: Arc<ConversationEngine>, embeddings: Arc<EmbeddingService>) -> Self {
        Self { engine, embeddings }
    }
}
