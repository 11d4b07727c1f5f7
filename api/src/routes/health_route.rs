//! GET /health: embedding backend readiness plus session count.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use embedding_service::HealthStatus;
use serde::Serialize;

use crate::app::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok` or `degraded`.
    pub status: &'static str,
    pub embedding: HealthStatus,
    pub sessions: usize,
}

/// 200 when the embedding backend answers, 503 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let embedding = state.embeddings.health().await;
    let sessions = state.engine.sessions().len().await;
    let (status, label) = if embedding.ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    ApiResponse::success(HealthReport {
        status: label,
        embedding,
        sessions,
    })
    .into_response_with_status(status)
}
