//! # Session Store Module
//!
//! Per-user conversation context. Each user's session sits behind its own
//! async mutex: the controller holds it for the whole handling of one event,
//! which serializes a user's events without blocking anyone else.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::UserId;
use tokio::sync::Mutex;

use crate::recipe::RecipeSummary;

/// Where a user is in the browse flow, with what has been collected so far
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingCategory {
        requested_count: u32,
    },
    AwaitingRecipeChoice {
        requested_count: u32,
        category: String,
        candidates: Vec<RecipeSummary>,
    },
}

impl ConversationState {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ConversationState::Idle => "idle",
            ConversationState::AwaitingCategory { .. } => "awaiting_category",
            ConversationState::AwaitingRecipeChoice { .. } => "awaiting_recipe_choice",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub state: ConversationState,
}

impl Session {
    pub fn reset(&mut self) {
        self.state = ConversationState::Idle;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ConversationState::Idle)
    }
}

/// Exclusive handle on one user's session
pub type SessionHandle = Arc<Mutex<Session>>;

/// Mapping from user identity to session, created lazily
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Handle for `user`, creating an idle session on first use
    async fn session(&self, user: UserId) -> SessionHandle;
}

/// Process-lifetime store; sessions are never expired
#[derive(Default)]
pub struct InMemSessionStore {
    sessions: Mutex<HashMap<UserId, SessionHandle>>,
}

impl InMemSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users that have a session, reported at shutdown
    pub async fn user_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemSessionStore {
    async fn session(&self, user: UserId) -> SessionHandle {
        let mut sessions = self.sessions.lock().await;
        Arc::clone(sessions.entry(user).or_default())
    }
}
