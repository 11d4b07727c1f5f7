//! HTTP surface of the helpdesk bot.
//!
//! - `POST /messages`: one message in, replies and the new state out.
//! - `DELETE /sessions/{user_id}`: drops a conversation without replying.
//! - `GET /health`: embedding backend readiness.

mod app;
mod error_handler;
mod middleware_layer;
mod routes;

use std::{future::Future, sync::Arc};

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tracing::info;

pub use crate::app::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        health_route::health, messages::messages_route::post_message,
        sessions_route::delete_session,
    },
};

/// Builds the router with every route and the rejection mapper.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/messages", post(post_message))
        .route("/sessions/{user_id}", delete(delete_session))
        .route("/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Serves the API on `addr` until `shutdown` resolves.
pub async fn start<F>(state: Arc<AppState>, addr: &str, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %addr, "http api listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(AppError::Server)?;

    info!("http api stopped");
    Ok(())
}
