//! POST /messages: feeds one user message to the conversation engine.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::info;

use crate::{
    app::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::messages::message_request::{MessageRequest, MessageResponse},
};

/// Handler: POST /messages
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/messages \
///   -H 'content-type: application/json' \
///   -d '{"user_id":"42","text":"/start"}'
/// ```
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MessageRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    let user_id = body.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".into()));
    }

    let reply = state.engine.handle(user_id, &body.text).await?;
    info!(
        user_id,
        replies = reply.replies.len(),
        state = ?reply.state,
        "message handled"
    );

    Ok(ApiResponse::success(MessageResponse {
        replies: reply.replies,
        state: reply.state,
    }))
}
