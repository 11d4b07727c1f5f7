//! Embedding backends used by the helpdesk knowledge base.
//!
//! - [`config`]: provider kinds and env-driven model configs.
//! - [`services`]: thin HTTP clients (Ollama, OpenAI) and the offline hashing backend.
//! - [`embedding_service::EmbeddingService`]: single entry point that routes by provider.
//! - [`health_service`]: best-effort readiness probes suitable for `/health`.

pub mod config;
pub mod embedding_service;
pub mod error_handler;
pub mod health_service;
pub mod services;

pub use config::{embedding_model_config::EmbeddingModelConfig, embedding_provider::EmbeddingProvider};
pub use embedding_service::EmbeddingService;
pub use error_handler::{ConfigError, EmbeddingError, Result};
pub use health_service::HealthStatus;
