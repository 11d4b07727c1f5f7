//! Per-user conversation sessions.
//!
//! The store is a map `user id -> Arc<Mutex<Session>>` behind an `RwLock`.
//! A message handler holds only its own session lock, so messages from one
//! user are processed in order while different users never contend.
//!
//! Entries exist only while a conversation is active. Ending one retires the
//! entry; a handler that was queued on a retired session looks it up again.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::state::ConversationState;

/// Scratch values collected during one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFields {
    /// Last answer shown to the user.
    pub last_answer: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// `None` means no active conversation.
    pub state: Option<ConversationState>,
    pub fields: SessionFields,
    retired: bool,
}

impl Session {
    /// Clears fields and enters `AwaitingProblem`.
    pub fn restart(&mut self) {
        self.fields = SessionFields::default();
        self.state = Some(ConversationState::AwaitingProblem);
    }

    /// Clears fields and leaves the conversation.
    pub fn end(&mut self) {
        self.fields = SessionFields::default();
        self.state = None;
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Set once the store has dropped this session's entry.
    pub fn is_retired(&self) -> bool {
        self.retired
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing session for `user_id`, or a fresh inactive one.
    pub async fn get_or_create(&self, user_id: &str) -> SessionHandle {
        if let Some(s) = self.sessions.read().await.get(user_id) {
            return Arc::clone(s);
        }
        let mut map = self.sessions.write().await;
        Arc::clone(map.entry(user_id.to_string()).or_insert_with(|| {
            debug!(user_id, "session created");
            Arc::new(Mutex::new(Session::default()))
        }))
    }

    /// Session for `user_id` if one is stored; never creates.
    pub async fn get(&self, user_id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(user_id).cloned()
    }

    /// Drops the entry of a conversation that just ended.
    ///
    /// The caller holds `session`, the lock of `handle`. A newer entry
    /// stored under the same id is left alone.
    pub async fn retire(&self, user_id: &str, handle: &SessionHandle, session: &mut Session) {
        session.retired = true;
        let mut map = self.sessions.write().await;
        if map.get(user_id).is_some_and(|h| Arc::ptr_eq(h, handle)) {
            map.remove(user_id);
            debug!(user_id, "session retired");
        }
    }

    /// Drops the session; returns whether one existed.
    pub async fn remove(&self, user_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(user_id);
        match removed {
            Some(handle) => {
                handle.lock().await.retired = true;
                debug!(user_id, "session removed");
                true
            }
            None => false,
        }
    }

    /// Current state for `user_id`; `None` when unknown or inactive.
    pub async fn state_of(&self, user_id: &str) -> Option<ConversationState> {
        let handle = self.sessions.read().await.get(user_id).cloned()?;
        let session = handle.lock().await;
        session.state
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
