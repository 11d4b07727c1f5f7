use std::time::Duration;

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::{
    chunks::{MAX_MESSAGE_LEN, split_message},
    config::TelegramConfig,
    errors::{Result, TelegramError},
    types::{ApiResponse, GetUpdatesRequest, Message, SendMessageRequest, Update, User},
};

/// Slack on top of the long-poll timeout before the HTTP call gives up.
const HTTP_TIMEOUT_SLACK_SECS: u64 = 10;

/// Bot API HTTP client.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    cfg: TelegramConfig,
}

impl TelegramClient {
    pub fn new(cfg: TelegramConfig) -> Result<Self> {
        cfg.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(
                cfg.poll_timeout_secs + HTTP_TIMEOUT_SLACK_SECS,
            ))
            .build()?;
        Ok(Self { http, cfg })
    }

    pub fn config(&self) -> &TelegramConfig {
        &self.cfg
    }

    /// Identity of the bot; used as a startup connectivity check.
    #[instrument(skip_all)]
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-polls for updates newer than `offset`.
    #[instrument(skip_all, fields(offset = ?offset, timeout_secs = timeout_secs))]
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let body = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message"],
        };
        let updates: Vec<Update> = self.call("getUpdates", &body).await?;
        debug!(count = updates.len(), "updates received");
        Ok(updates)
    }

    #[instrument(skip_all, fields(chat_id = chat_id, text_len = text.len()))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        self.call("sendMessage", &SendMessageRequest { chat_id, text })
            .await
    }

    /// Sends `text` as one or more messages, each within the Bot API limit.
    pub async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let parts = split_message(text, MAX_MESSAGE_LEN);
        if parts.len() > 1 {
            debug!(chat_id, parts = parts.len(), "long reply split");
        }
        for part in parts {
            self.send_message(chat_id, part).await?;
        }
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(method, "bot api call");
        let resp = self
            .http
            .post(self.cfg.method_url(method))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;

        let envelope: ApiResponse<T> = match serde_json::from_slice(&bytes) {
            Ok(env) => env,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::from_status(status.as_u16(), None, None));
            }
            Err(e) => return Err(e.into()),
        };

        if envelope.ok && status.is_success() {
            return envelope
                .result
                .ok_or_else(|| TelegramError::InvalidResponse(format!("{method}: missing result")));
        }

        let code = envelope.error_code.unwrap_or(status.as_u16());
        let retry_after = envelope.parameters.and_then(|p| p.retry_after);
        Err(TelegramError::from_status(code, envelope.description, retry_after))
    }
}
