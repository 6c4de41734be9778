//! Conversation session store.
//!
//! Sessions are created lazily on first access, appended to after every
//! completed exchange, and live until removed or expired. Nothing is
//! persisted; a restart loses every transcript.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::llm_client::{PromptMessage, Role};

/// One turn of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

impl From<&ChatMessage> for PromptMessage {
    fn from(message: &ChatMessage) -> Self {
        PromptMessage {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Ordered transcript of one conversation.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    updated_at: DateTime<Utc>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

impl ChatSession {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Completed (user, assistant) pairs.
    pub fn exchange_count(&self) -> usize {
        self.messages.len() / 2
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn push_exchange(&mut self, user: &str, assistant: &str) {
        self.messages.push(ChatMessage::new(Role::User, user));
        self.messages.push(ChatMessage::new(Role::Assistant, assistant));
        self.updated_at = Utc::now();
    }
}

/// Shared handle: every lookup of the same key yields the same session.
pub type SessionHandle = Arc<Mutex<ChatSession>>;

/// Locks a session, recovering the data if a previous holder panicked.
pub fn lock_session(handle: &SessionHandle) -> MutexGuard<'_, ChatSession> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keyed transcript storage injected into the orchestrator.
pub trait SessionStore: Send + Sync {
    /// Returns the session for `key`, creating an empty one on first access.
    fn get_or_create(&self, key: &str) -> SessionHandle;

    /// Drops the session for `key`. Returns whether one existed.
    fn remove(&self, key: &str) -> bool;

    /// Drops sessions idle for at least `max_idle`. Returns how many went.
    fn expire_idle(&self, max_idle: Duration) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the transcript for `key`.
    fn history(&self, key: &str) -> Vec<ChatMessage> {
        lock_session(&self.get_or_create(key)).messages().to_vec()
    }

    fn append_exchange(&self, key: &str, user: &str, assistant: &str) {
        lock_session(&self.get_or_create(key)).push_exchange(user, assistant);
    }
}

/// Process-local store. Sessions vanish with the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, key: &str) -> SessionHandle {
        self.map()
            .entry(key.to_string())
            .or_insert_with(|| {
                debug!(session = key, "Creating chat session");
                Arc::new(Mutex::new(ChatSession::default()))
            })
            .clone()
    }

    fn remove(&self, key: &str) -> bool {
        self.map().remove(key).is_some()
    }

    fn expire_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now();
        let mut map = self.map();
        let before = map.len();
        map.retain(|_, handle| now - lock_session(handle).updated_at() < max_idle);
        let expired = before - map.len();
        if expired > 0 {
            debug!(expired, "Expired idle chat sessions");
        }
        expired
    }

    fn len(&self) -> usize {
        self.map().len()
    }
}
