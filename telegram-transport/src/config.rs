use crate::errors::{Result, TelegramError};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Bot API connection settings.
#[derive(Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_base: String,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout_secs: u64,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }

    /// Reads `TELEGRAM_BOT_TOKEN` (required), `TELEGRAM_API_BASE` and
    /// `TELEGRAM_POLL_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| TelegramError::Config("TELEGRAM_BOT_TOKEN is not set".into()))?;

        let api_base = std::env::var("TELEGRAM_API_BASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let poll_timeout_secs = match std::env::var("TELEGRAM_POLL_TIMEOUT_SECS") {
            Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<u64>().map_err(|e| {
                TelegramError::Config(format!("TELEGRAM_POLL_TIMEOUT_SECS: {e}"))
            })?,
            _ => DEFAULT_POLL_TIMEOUT_SECS,
        };

        let cfg = Self {
            token: token.trim().to_string(),
            api_base,
            poll_timeout_secs,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(TelegramError::Config("bot token is empty".into()));
        }
        let base = self.api_base.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(TelegramError::Config(format!(
                "api base must start with http:// or https://, got {base}"
            )));
        }
        Ok(())
    }

    /// `{base}/bot{token}/{method}`
    pub(crate) fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim().trim_end_matches('/'),
            self.token,
            method
        )
    }
}
