//! DELETE /sessions/{user_id}: silently drops a conversation.

use std::sync::Arc;

use axum::extract::{Path, State};
use serde::Serialize;
use tracing::info;

use crate::app::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct SessionDeleted {
    /// False when the user had no session.
    pub removed: bool,
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResponse<SessionDeleted> {
    let removed = state.engine.forget(&user_id).await;
    info!(user_id = %user_id, removed, "session delete requested");
    ApiResponse::success(SessionDeleted { removed })
}
