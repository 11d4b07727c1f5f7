//! Thin Ollama client for embeddings.
//!
//! `POST {endpoint}/api/embeddings` with `{ model, prompt }`, answered by
//! `{ embedding: number[] }`.
//!
//! # Examples
//!
//! ```no_run
//! use embedding_service::{EmbeddingModelConfig, EmbeddingProvider};
//! use embedding_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EmbeddingModelConfig {
//!     provider: EmbeddingProvider::Ollama,
//!     model: "all-minilm".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     api_key: None,
//!     dim: Some(384),
//!     timeout_secs: Some(30),
//! };
//! let svc = OllamaService::new(cfg)?;
//! let vec = svc.embeddings("la impresora no imprime").await?;
//! println!("dim = {}", vec.len());
//! # Ok(()) }
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::{
    config::{embedding_model_config::EmbeddingModelConfig, embedding_provider::EmbeddingProvider},
    error_handler::{EmbeddingError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Ollama embeddings client. Reuses one HTTP client with the configured timeout.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: EmbeddingModelConfig,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new client.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::InvalidProvider`] if `cfg.provider` is not Ollama
    /// - [`ProviderErrorKind::InvalidEndpoint`] if the endpoint lacks http/https
    /// - [`EmbeddingError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: EmbeddingModelConfig) -> Result<Self, EmbeddingError> {
        if cfg.provider != EmbeddingProvider::Ollama {
            return Err(
                ProviderError::new(EmbeddingProvider::Ollama, ProviderErrorKind::InvalidProvider)
                    .into(),
            );
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                EmbeddingProvider::Ollama,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let url_embeddings = format!("{}/api/embeddings", endpoint.trim_end_matches('/'));

        Ok(Self {
            client,
            cfg,
            url_embeddings,
        })
    }

    /// Retrieves one embedding via `/api/embeddings`.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::HttpStatus`] for non-2xx responses
    /// - [`ProviderErrorKind::Decode`] if the body cannot be parsed
    /// - [`ProviderErrorKind::DimensionMismatch`] if `cfg.dim` is set and differs
    #[instrument(skip_all, fields(model = %self.cfg.model, input_len = input.len()))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, EmbeddingError> {
        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "Ollama /api/embeddings returned non-success status"
            );

            return Err(ProviderError::new(
                EmbeddingProvider::Ollama,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                EmbeddingProvider::Ollama,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `{{ embedding: number[] }}`"
                )),
            )
        })?;

        if let Some(want) = self.cfg.dim {
            if out.embedding.len() != want {
                return Err(ProviderError::new(
                    EmbeddingProvider::Ollama,
                    ProviderErrorKind::DimensionMismatch {
                        got: out.embedding.len(),
                        want,
                    },
                )
                .into());
            }
        }

        debug!(
            dim = out.embedding.len(),
            latency_ms = started.elapsed().as_millis(),
            "embedding received"
        );
        Ok(out.embedding)
    }

    pub fn config(&self) -> &EmbeddingModelConfig {
        &self.cfg
    }
}

/// Request body for `/api/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response body for `/api/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}
