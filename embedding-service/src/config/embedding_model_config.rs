use crate::config::embedding_provider::EmbeddingProvider;

/// Configuration for one embedding backend.
///
/// # Fields
///
/// - `provider`: which backend to call.
/// - `model`: model identifier (e.g. `"all-minilm"`, `"text-embedding-3-small"`).
/// - `endpoint`: base URL of the backend; empty for [`EmbeddingProvider::Hashing`].
/// - `api_key`: bearer token for providers that need one.
/// - `dim`: expected vector size; responses of a different size are rejected.
/// - `timeout_secs`: request timeout.
///
/// # Examples
///
/// ```
/// use embedding_service::{EmbeddingModelConfig, EmbeddingProvider};
///
/// let cfg = EmbeddingModelConfig {
///     provider: EmbeddingProvider::Ollama,
///     model: "all-minilm".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     api_key: None,
///     dim: Some(384),
///     timeout_secs: Some(30),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingModelConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub dim: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl EmbeddingModelConfig {
    /// Offline hashing backend with `dim` buckets.
    pub fn hashing(dim: usize) -> Self {
        Self {
            provider: EmbeddingProvider::Hashing,
            model: format!("hashing-{dim}"),
            endpoint: String::new(),
            api_key: None,
            dim: Some(dim),
            timeout_secs: None,
        }
    }

    /// Checks the fields each provider relies on.
    pub fn validate(&self) -> crate::Result<()> {
        use crate::error_handler::{ConfigError, validate_http_endpoint};

        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        match self.provider {
            EmbeddingProvider::Hashing => match self.dim {
                Some(d) if d > 0 => Ok(()),
                _ => Err(ConfigError::OutOfRange {
                    field: "dim",
                    detail: "hashing backend needs dim > 0",
                }
                .into()),
            },
            EmbeddingProvider::Ollama => validate_http_endpoint("OLLAMA_URL", &self.endpoint),
            EmbeddingProvider::OpenAI => {
                validate_http_endpoint("OPENAI_URL", &self.endpoint)?;
                match self.api_key.as_deref() {
                    Some(k) if !k.trim().is_empty() => Ok(()),
                    _ => Err(ConfigError::MissingVar("OPENAI_API_KEY").into()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_requires_positive_dim() {
        assert!(EmbeddingModelConfig::hashing(64).validate().is_ok());
        assert!(EmbeddingModelConfig::hashing(0).validate().is_err());
    }

    #[test]
    fn openai_requires_key() {
        let cfg = EmbeddingModelConfig {
            provider: EmbeddingProvider::OpenAI,
            model: "text-embedding-3-small".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: None,
            dim: None,
            timeout_secs: None,
        };
        assert!(cfg.validate().is_err());
    }
}
