//! Error types for the Telegram transport.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TelegramError>;

#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bad or revoked bot token (HTTP 401).
    #[error("[Telegram] unauthorized")]
    Unauthorized,

    /// Unknown method or bad base URL (HTTP 404).
    #[error("[Telegram] not found")]
    NotFound,

    /// Flood control (HTTP 429).
    #[error("[Telegram] rate limited")]
    RateLimited {
        /// `retry_after` hint in seconds when the API sent one.
        retry_after_secs: Option<u64>,
    },

    /// Gateway / server error (HTTP 5xx).
    #[error("[Telegram] server error: status {0}")]
    Server(u16),

    /// Any other API-level rejection.
    #[error("[Telegram] api error {code}: {description}")]
    Api { code: u16, description: String },

    #[error("[Telegram] timeout")]
    Timeout,

    /// DNS / connect / reset without an HTTP status.
    #[error("[Telegram] network error: {0}")]
    Network(String),

    #[error("[Telegram] invalid response: {0}")]
    InvalidResponse(String),

    #[error("[Telegram] config error: {0}")]
    Config(String),
}

impl TelegramError {
    /// Errors that retrying cannot fix.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TelegramError::Unauthorized | TelegramError::NotFound | TelegramError::Config(_)
        )
    }

    /// Maps an HTTP / API error code plus optional details.
    pub fn from_status(code: u16, description: Option<String>, retry_after: Option<u64>) -> Self {
        match code {
            401 => TelegramError::Unauthorized,
            404 => TelegramError::NotFound,
            429 => TelegramError::RateLimited {
                retry_after_secs: retry_after,
            },
            500..=599 => TelegramError::Server(code),
            _ => TelegramError::Api {
                code,
                description: description.unwrap_or_else(|| "unknown error".to_string()),
            },
        }
    }
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return TelegramError::Timeout;
        }
        if let Some(status) = e.status() {
            return TelegramError::from_status(status.as_u16(), None, None);
        }
        if e.is_decode() {
            return TelegramError::InvalidResponse(e.to_string());
        }
        // Strip the URL: it embeds the bot token.
        TelegramError::Network(e.without_url().to_string())
    }
}

impl From<serde_json::Error> for TelegramError {
    fn from(e: serde_json::Error) -> Self {
        TelegramError::InvalidResponse(e.to_string())
    }
}
