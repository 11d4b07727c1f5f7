//! Health probes for embedding backends.
//!
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//! - OpenAI: `GET {endpoint}/v1/models` with bearer auth
//! - Hashing: always healthy, no I/O
//!
//! [`HealthService::check`] never fails: errors are mapped to `ok = false`,
//! which is what a `/health` endpoint wants.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::embedding_model_config::EmbeddingModelConfig;
use crate::config::embedding_provider::EmbeddingProvider;
use crate::error_handler::{EmbeddingError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for one backend.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &EmbeddingModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: cfg.provider.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Reuses a single HTTP client for all probes.
#[derive(Debug)]
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// # Errors
    /// Returns [`EmbeddingError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, EmbeddingError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Probes the backend described by `cfg`.
    pub async fn check(&self, cfg: &EmbeddingModelConfig) -> HealthStatus {
        let start = Instant::now();
        let result = match cfg.provider {
            EmbeddingProvider::Hashing => Ok(HealthStatus::new(
                cfg,
                true,
                0,
                "offline hashing backend; no remote dependency",
            )),
            EmbeddingProvider::Ollama => self.try_probe_ollama(cfg).await,
            EmbeddingProvider::OpenAI => self.try_probe_openai(cfg).await,
        };

        match result {
            Ok(status) => {
                info!(
                    provider = %status.provider,
                    model = %status.model,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status =
                    HealthStatus::new(cfg, false, start.elapsed().as_millis(), err.to_string());
                warn!(
                    provider = %status.provider,
                    endpoint = %status.endpoint,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    async fn try_probe_ollama(
        &self,
        cfg: &EmbeddingModelConfig,
    ) -> Result<HealthStatus, EmbeddingError> {
        let url = format!("{}/api/tags", cfg.endpoint.trim_end_matches('/'));
        let start = Instant::now();
        debug!(provider = "ollama", "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .send()
            .await?;
        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(HealthError::HttpStatus(HttpError { status, url, snippet }).into());
        }

        // { "models": [ { "name": "all-minilm:latest" }, ... ] }
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        Ok(match resp.json::<Tags>().await {
            Ok(Tags { models: Some(models) }) => {
                // Ollama reports `name:tag`; a bare model name means `:latest`.
                let exists = models.iter().any(|m| {
                    m.name == cfg.model || m.name.split(':').next() == Some(cfg.model.as_str())
                });
                if exists {
                    HealthStatus::new(cfg, true, latency, "Ollama is healthy; model is available")
                } else {
                    HealthStatus::new(
                        cfg,
                        false,
                        latency,
                        "Ollama is up, but model not found in /api/tags",
                    )
                }
            }
            Ok(Tags { models: None }) => {
                HealthStatus::new(cfg, true, latency, "Ollama is reachable; no `models` field")
            }
            Err(e) => HealthStatus::new(
                cfg,
                true,
                latency,
                format!("Ollama is reachable; failed to decode /api/tags: {e}"),
            ),
        })
    }

    async fn try_probe_openai(
        &self,
        cfg: &EmbeddingModelConfig,
    ) -> Result<HealthStatus, EmbeddingError> {
        let url = format!("{}/v1/models", cfg.endpoint.trim_end_matches('/'));
        let api_key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Setup("missing OpenAI API key".into()))?;
        let auth = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| HealthError::Setup(format!("invalid API key header: {e}")))?;

        let start = Instant::now();
        debug!(provider = "openai", "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .header(header::AUTHORIZATION, auth)
            .send()
            .await?;
        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(HealthError::HttpStatus(HttpError { status, url, snippet }).into());
        }

        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        Ok(match resp.json::<Models>().await {
            Ok(models) if models.data.iter().any(|m| m.id == cfg.model) => {
                HealthStatus::new(cfg, true, latency, "OpenAI is healthy; model is available")
            }
            Ok(_) => HealthStatus::new(
                cfg,
                false,
                latency,
                "OpenAI is up, but model not found in /v1/models",
            ),
            Err(e) => HealthStatus::new(
                cfg,
                true,
                latency,
                format!("OpenAI is reachable; failed to decode /v1/models: {e}"),
            ),
        })
    }

    fn timeout_for(&self, cfg: &EmbeddingModelConfig) -> Duration {
        cfg.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
    }
}
