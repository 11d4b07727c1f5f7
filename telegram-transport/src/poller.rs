//! Long-polling loop.
//!
//! Each batch is grouped by user; users are served concurrently while one
//! user's messages are handled strictly in arrival order. The offset only
//! advances past a batch once every message in it has been processed.

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
    time::Duration,
};

use helpdesk_flow::{Command, ConversationEngine};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    client::TelegramClient,
    errors::{Result, TelegramError},
    types::Update,
};

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Sent when the engine fails to finish a step (ticket not stored).
pub const TRANSIENT_FAILURE_REPLY: &str =
    "⚠️ No pude guardar tu ticket en este momento. Envía la prioridad de nuevo para reintentar.";

pub struct Poller {
    client: TelegramClient,
    engine: Arc<ConversationEngine>,
    /// Filled from `getMe`; commands naming another bot are skipped.
    bot_username: OnceLock<String>,
}

struct Inbound {
    chat_id: i64,
    text: String,
}

impl Poller {
    pub fn new(client: TelegramClient, engine: Arc<ConversationEngine>) -> Self {
        Self {
            client,
            engine,
            bot_username: OnceLock::new(),
        }
    }

    /// Presets the username `run` would learn from `getMe`.
    pub fn with_bot_username(self, username: impl Into<String>) -> Self {
        let _ = self.bot_username.set(username.into());
        self
    }

    /// Polls until a fatal error (bad token, bad base URL).
    ///
    /// Transient failures back off exponentially up to 30s, or for the
    /// `retry_after` the API asks for.
    pub async fn run(&self) -> Result<()> {
        let me = self.client.get_me().await?;
        if let Some(name) = &me.username {
            let _ = self.bot_username.set(name.clone());
        }
        info!(
            bot = me.username.as_deref().unwrap_or(&me.first_name),
            "telegram polling started"
        );

        let mut offset = None;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            match self.poll_once(offset).await {
                Ok(next) => {
                    offset = next;
                    backoff = INITIAL_BACKOFF;
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "telegram polling stopped");
                    return Err(e);
                }
                Err(e) => {
                    let wait = match &e {
                        TelegramError::RateLimited {
                            retry_after_secs: Some(secs),
                        } => Duration::from_secs(*secs),
                        _ => backoff,
                    };
                    warn!(error = %e, wait_secs = wait.as_secs(), "getUpdates failed; retrying");
                    tokio::time::sleep(wait).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }

    /// One `getUpdates` round; returns the offset for the next call.
    #[instrument(skip_all, fields(offset = ?offset))]
    pub async fn poll_once(&self, offset: Option<i64>) -> Result<Option<i64>> {
        let timeout = self.client.config().poll_timeout_secs;
        let updates = self.client.get_updates(offset, timeout).await?;
        let next = next_offset(offset, &updates);

        let mut by_user: HashMap<String, Vec<Inbound>> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for update in &updates {
            let Some((msg, text)) = update.text_message() else {
                debug!(update_id = update.update_id, "non-text update skipped");
                continue;
            };
            if self.addressed_elsewhere(text) {
                debug!(update_id = update.update_id, "command for another bot skipped");
                continue;
            }
            let key = msg.user_key();
            if !by_user.contains_key(&key) {
                order.push(key.clone());
            }
            by_user.entry(key).or_default().push(Inbound {
                chat_id: msg.chat.id,
                text: text.to_string(),
            });
        }

        let mut tasks = JoinSet::new();
        for key in order {
            let Some(inbound) = by_user.remove(&key) else {
                continue;
            };
            let client = self.client.clone();
            let engine = Arc::clone(&self.engine);
            tasks.spawn(async move {
                for msg in inbound {
                    dispatch(&client, &engine, &key, msg).await;
                }
            });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "update task panicked");
            }
        }

        Ok(next)
    }

    fn addressed_elsewhere(&self, text: &str) -> bool {
        match (Command::addressee(text), self.bot_username.get()) {
            (Some(to), Some(me)) => !to.eq_ignore_ascii_case(me),
            _ => false,
        }
    }
}

/// Highest `update_id + 1`, or the previous offset for an empty batch.
fn next_offset(current: Option<i64>, updates: &[Update]) -> Option<i64> {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .map_or(current, |n| Some(current.map_or(n, |c| c.max(n))))
}

async fn dispatch(client: &TelegramClient, engine: &ConversationEngine, user: &str, msg: Inbound) {
    let replies = match engine.handle(user, &msg.text).await {
        Ok(reply) => reply.replies,
        Err(e) => {
            error!(user, error = %e, "conversation step failed");
            vec![TRANSIENT_FAILURE_REPLY.to_string()]
        }
    };

    for text in replies {
        if let Err(e) = client.send_text(msg.chat_id, &text).await {
            warn!(user, chat_id = msg.chat_id, error = %e, "sendMessage failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updates(ids: &[i64]) -> Vec<Update> {
        ids.iter()
            .map(|&update_id| Update {
                update_id,
                message: None,
            })
            .collect()
    }

    #[test]
    fn offset_advances_past_highest_update() {
        assert_eq!(next_offset(None, &updates(&[5, 3, 4])), Some(6));
        assert_eq!(next_offset(Some(6), &updates(&[])), Some(6));
        assert_eq!(next_offset(None, &updates(&[])), None);
        assert_eq!(next_offset(Some(10), &updates(&[7])), Some(10));
    }
}
