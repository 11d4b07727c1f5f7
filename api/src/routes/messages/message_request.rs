use helpdesk_flow::ConversationState;
use serde::{Deserialize, Serialize};

/// Request payload for `POST /messages`.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// Caller-chosen conversation key.
    pub user_id: String,
    /// Free text or a `/command`.
    pub text: String,
}

/// Response payload for `POST /messages`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Bot replies in send order; empty when the message was ignored.
    pub replies: Vec<String>,
    /// State after the message; `null` when no conversation is active.
    pub state: Option<ConversationState>,
}
