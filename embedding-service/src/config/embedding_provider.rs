use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Backend used to turn text into vectors.
///
/// ```
/// use embedding_service::EmbeddingProvider;
///
/// let p: EmbeddingProvider = "Ollama".parse().unwrap();
/// assert_eq!(p, EmbeddingProvider::Ollama);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddingProvider {
    /// Local Ollama runtime (`/api/embeddings`).
    Ollama,
    /// OpenAI-compatible REST API (`/v1/embeddings`).
    OpenAI,
    /// Offline feature hashing; no network, deterministic.
    Hashing,
}

impl EmbeddingProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingProvider::Ollama => "ollama",
            EmbeddingProvider::OpenAI => "openai",
            EmbeddingProvider::Hashing => "hashing",
        }
    }
}

impl fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(EmbeddingProvider::Ollama),
            "openai" | "chatgpt" => Ok(EmbeddingProvider::OpenAI),
            "hashing" | "hash" | "offline" => Ok(EmbeddingProvider::Hashing),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_aliases() {
        assert_eq!("openai".parse::<EmbeddingProvider>().unwrap(), EmbeddingProvider::OpenAI);
        assert_eq!(" HASH ".parse::<EmbeddingProvider>().unwrap(), EmbeddingProvider::Hashing);
        assert!("bert".parse::<EmbeddingProvider>().is_err());
    }
}
