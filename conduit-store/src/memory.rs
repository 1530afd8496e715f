//! In-memory conversation store.

use std::collections::HashMap;

use conduit_types::{StoreError, Turn};
use tokio::sync::RwLock;

use crate::trait_def::ConversationStore;

/// In-memory conversation store backed by a `HashMap` behind a `RwLock`.
///
/// Suitable for testing, prototyping, and single-process use where
/// persistence across restarts is not required.
pub struct MemoryStore {
    conversations: RwLock<HashMap<String, Vec<Turn>>>,
}

impl MemoryStore {
    /// Create a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore for MemoryStore {
    async fn save_turn(&self, conv_id: &str, turn: Turn) -> Result<(), StoreError> {
        let mut conversations = self.conversations.write().await;
        let turns = conversations.entry(conv_id.to_string()).or_default();
        if !turns.contains(&turn) {
            turns.push(turn);
        }
        Ok(())
    }

    async fn load_context(&self, conv_id: &str, k: i64) -> Result<Vec<Turn>, StoreError> {
        let conversations = self.conversations.read().await;
        let Some(turns) = conversations.get(conv_id) else {
            return Ok(Vec::new());
        };
        if k <= 0 || k as usize >= turns.len() {
            return Ok(turns.clone());
        }
        let start = turns.len() - k as usize;
        Ok(turns[start..].to_vec())
    }
}
