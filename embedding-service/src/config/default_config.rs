//! Embedding configs loaded from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `EMBEDDING_PROVIDER`     = `ollama` (default), `openai` or `hashing`
//! - `EMBEDDING_MODEL`        = model name (provider-specific default)
//! - `EMBEDDING_DIM`          = optional expected vector size
//! - `EMBEDDING_TIMEOUT_SECS` = request timeout (default 30)
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` (default `http://localhost:11434`)
//!
//! OpenAI:
//! - `OPENAI_API_KEY` (required), `OPENAI_URL` (default `https://api.openai.com`)
//!
//! Hashing:
//! - `HASHING_DIM` (default 256)

use crate::{
    config::{embedding_model_config::EmbeddingModelConfig, embedding_provider::EmbeddingProvider},
    error_handler::{ConfigError, EmbeddingError, env_opt, env_opt_u64, env_opt_usize, must_env},
};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "all-minilm";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_HASHING_DIM: usize = 256;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builds the config selected by `EMBEDDING_PROVIDER`.
pub fn config_from_env() -> Result<EmbeddingModelConfig, EmbeddingError> {
    let provider = match env_opt("EMBEDDING_PROVIDER") {
        Some(raw) => raw.parse::<EmbeddingProvider>()?,
        None => EmbeddingProvider::Ollama,
    };

    let cfg = match provider {
        EmbeddingProvider::Ollama => config_ollama_embedding()?,
        EmbeddingProvider::OpenAI => config_openai_embedding()?,
        EmbeddingProvider::Hashing => config_hashing_embedding()?,
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Resolves the Ollama endpoint.
///
/// Precedence: `OLLAMA_URL`, then `OLLAMA_PORT` on localhost, then the default.
fn ollama_endpoint() -> Result<String, EmbeddingError> {
    if let Some(url) = env_opt("OLLAMA_URL") {
        return Ok(url);
    }
    if let Some(port) = env_opt("OLLAMA_PORT") {
        port.trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{}", port.trim()));
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}

/// Ollama embedding model.
///
/// # Defaults
/// - `model = "all-minilm"` (MiniLM-L6 sentence embeddings, 384 dims)
/// - `timeout_secs = Some(30)`
pub fn config_ollama_embedding() -> Result<EmbeddingModelConfig, EmbeddingError> {
    Ok(EmbeddingModelConfig {
        provider: EmbeddingProvider::Ollama,
        model: env_opt("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        endpoint: ollama_endpoint()?,
        api_key: None,
        dim: env_opt_usize("EMBEDDING_DIM")?,
        timeout_secs: Some(env_opt_u64("EMBEDDING_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}

/// OpenAI-compatible embedding model.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
pub fn config_openai_embedding() -> Result<EmbeddingModelConfig, EmbeddingError> {
    Ok(EmbeddingModelConfig {
        provider: EmbeddingProvider::OpenAI,
        model: env_opt("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        endpoint: env_opt("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
        api_key: Some(must_env("OPENAI_API_KEY")?),
        dim: env_opt_usize("EMBEDDING_DIM")?,
        timeout_secs: Some(env_opt_u64("EMBEDDING_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}

/// Offline hashing backend; `HASHING_DIM` buckets.
pub fn config_hashing_embedding() -> Result<EmbeddingModelConfig, EmbeddingError> {
    let dim = env_opt_usize("HASHING_DIM")?.unwrap_or(DEFAULT_HASHING_DIM);
    Ok(EmbeddingModelConfig::hashing(dim))
}
