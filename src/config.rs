//! Process configuration read from the environment (after `.env`).

use std::{fmt, path::PathBuf, str::FromStr};

use embedding_service::{
    EmbeddingError, EmbeddingModelConfig, config::default_config::config_from_env,
};
use knowledge_base::{DEFAULT_SIMILARITY_THRESHOLD, MatcherConfig};
use telegram_transport::{TelegramConfig, TelegramError};
use thiserror::Error;

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_TICKETS_PATH: &str = "tickets.csv";

#[derive(Debug, Error)]
pub enum BotConfigError {
    #[error("[Bot Config] unsupported BOT_TRANSPORT: {0} (expected telegram, http or both)")]
    UnsupportedTransport(String),

    #[error("[Bot Config] invalid number in {var}: {reason}")]
    InvalidNumber { var: &'static str, reason: String },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Telegram(#[from] TelegramError),
}

/// Which front ends to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Telegram,
    Http,
    Both,
}

impl Transport {
    pub fn telegram(&self) -> bool {
        matches!(self, Transport::Telegram | Transport::Both)
    }

    pub fn http(&self) -> bool {
        matches!(self, Transport::Http | Transport::Both)
    }
}

impl FromStr for Transport {
    type Err = BotConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telegram" => Ok(Transport::Telegram),
            "http" => Ok(Transport::Http),
            "both" => Ok(Transport::Both),
            other => Err(BotConfigError::UnsupportedTransport(other.to_string())),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transport::Telegram => "telegram",
            Transport::Http => "http",
            Transport::Both => "both",
        })
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub transport: Transport,
    pub api_address: String,
    pub tickets_path: PathBuf,
    pub matcher: MatcherConfig,
    /// JSON corpus replacing the built-in manuals.
    pub kb_documents_path: Option<PathBuf>,
    pub embedding: EmbeddingModelConfig,
    /// Present only when the Telegram transport is enabled.
    pub telegram: Option<TelegramConfig>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, BotConfigError> {
        let transport = match env_opt("BOT_TRANSPORT") {
            Some(raw) => raw.parse()?,
            None => Transport::Telegram,
        };

        let threshold = match env_opt("SIMILARITY_THRESHOLD") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .map_err(|e| BotConfigError::InvalidNumber {
                    var: "SIMILARITY_THRESHOLD",
                    reason: e.to_string(),
                })?,
            None => DEFAULT_SIMILARITY_THRESHOLD,
        };

        let telegram = if transport.telegram() {
            Some(TelegramConfig::from_env()?)
        } else {
            None
        };

        Ok(Self {
            transport,
            api_address: env_opt("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.into()),
            tickets_path: env_opt("TICKETS_PATH")
                .unwrap_or_else(|| DEFAULT_TICKETS_PATH.into())
                .into(),
            matcher: MatcherConfig { threshold },
            kb_documents_path: env_opt("KB_DOCUMENTS_PATH").map(PathBuf::from),
            embedding: config_from_env()?,
            telegram,
        })
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_parsing() {
        assert_eq!("HTTP".parse::<Transport>().unwrap(), Transport::Http);
        assert_eq!(" both ".parse::<Transport>().unwrap(), Transport::Both);
        assert!("smtp".parse::<Transport>().is_err());
    }

    #[test]
    fn transport_flags() {
        assert!(Transport::Both.telegram() && Transport::Both.http());
        assert!(!Transport::Http.telegram());
        assert!(!Transport::Telegram.http());
    }
}
