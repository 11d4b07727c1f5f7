//! Telegram Bot API transport.
//!
//! [`TelegramClient`] wraps the two Bot API methods the bot needs
//! (`getUpdates`, `sendMessage`); [`Poller`] long-polls for updates and feeds
//! each text message to the conversation engine.

mod chunks;
mod client;
mod config;
mod errors;
mod poller;
pub mod types;

pub use chunks::{MAX_MESSAGE_LEN, split_message};
pub use client::TelegramClient;
pub use config::{DEFAULT_API_BASE, DEFAULT_POLL_TIMEOUT_SECS, TelegramConfig};
pub use errors::{Result, TelegramError};
pub use poller::{Poller, TRANSIENT_FAILURE_REPLY};
