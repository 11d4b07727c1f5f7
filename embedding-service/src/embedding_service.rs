//! Shared embedding service.
//!
//! Construct once, wrap in `Arc`, and hand clones to dependents. The backend
//! client is built eagerly from the config, so misconfiguration surfaces at
//! startup instead of on the first user message.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use embedding_service::{EmbeddingModelConfig, EmbeddingService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(EmbeddingService::new(EmbeddingModelConfig::hashing(256))?);
//! let v = svc.embed("mi equipo está lento").await?;
//! assert_eq!(v.len(), 256);
//! # Ok(()) }
//! ```

use tracing::{debug, info};

use crate::{
    config::{embedding_model_config::EmbeddingModelConfig, embedding_provider::EmbeddingProvider},
    error_handler::{EmbeddingError, ProviderError, ProviderErrorKind},
    health_service::{HealthService, HealthStatus},
    services::{
        hashing_service::HashingService, ollama_service::OllamaService,
        open_ai_service::OpenAiService,
    },
};

#[derive(Debug)]
enum Backend {
    Ollama(OllamaService),
    OpenAi(OpenAiService),
    Hashing(HashingService),
}

/// Routes embedding calls to the configured backend.
#[derive(Debug)]
pub struct EmbeddingService {
    cfg: EmbeddingModelConfig,
    backend: Backend,
    health: HealthService,
}

impl EmbeddingService {
    /// Validates `cfg` and builds the matching backend client.
    pub fn new(cfg: EmbeddingModelConfig) -> Result<Self, EmbeddingError> {
        cfg.validate()?;

        let backend = match cfg.provider {
            EmbeddingProvider::Ollama => Backend::Ollama(OllamaService::new(cfg.clone())?),
            EmbeddingProvider::OpenAI => Backend::OpenAi(OpenAiService::new(cfg.clone())?),
            EmbeddingProvider::Hashing => {
                Backend::Hashing(HashingService::new(cfg.dim.unwrap_or_default()))
            }
        };

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            "EmbeddingService initialized"
        );

        Ok(Self {
            health: HealthService::new(cfg.timeout_secs)?,
            cfg,
            backend,
        })
    }

    /// Embeds one text.
    ///
    /// # Errors
    /// [`ProviderErrorKind::EmptyInput`] for blank text on remote backends
    /// (they reject it anyway); transport/provider errors otherwise.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(provider = %self.cfg.provider, input_len = input.len(), "embed");
        match &self.backend {
            Backend::Hashing(h) => Ok(h.embeddings(input)),
            Backend::Ollama(_) | Backend::OpenAi(_) if input.trim().is_empty() => Err(
                ProviderError::new(self.cfg.provider, ProviderErrorKind::EmptyInput).into(),
            ),
            Backend::Ollama(o) => o.embeddings(input).await,
            Backend::OpenAi(o) => o.embeddings(input).await,
        }
    }

    /// Health snapshot for the configured backend.
    pub async fn health(&self) -> HealthStatus {
        self.health.check(&self.cfg).await
    }

    pub fn config(&self) -> &EmbeddingModelConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashing_backend_embeds_with_configured_dim() {
        let svc = EmbeddingService::new(EmbeddingModelConfig::hashing(48)).unwrap();
        let v = svc.embed("no tengo red").await.unwrap();
        assert_eq!(v.len(), 48);
    }

    #[test]
    fn invalid_config_fails_fast() {
        assert!(EmbeddingService::new(EmbeddingModelConfig::hashing(0)).is_err());
    }
}
