//! Type erasure for [`ConversationStore`] (RPITIT is not dyn-compatible).

use std::future::Future;
use std::pin::Pin;

use conduit_types::{StoreError, Turn};

use crate::trait_def::ConversationStore;

type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Dyn-compatible wrapper for [`ConversationStore`], so the orchestrator can
/// hold `Arc<dyn ErasedConversationStore>` instead of being generic over a
/// store type.
pub trait ErasedConversationStore: Send + Sync {
    /// Boxed-future form of [`ConversationStore::save_turn`].
    fn save_turn_dyn<'a>(&'a self, conv_id: &'a str, turn: Turn) -> StoreFuture<'a, ()>;

    /// Boxed-future form of [`ConversationStore::load_context`].
    fn load_context_dyn<'a>(&'a self, conv_id: &'a str, k: i64) -> StoreFuture<'a, Vec<Turn>>;

    /// Boxed-future form of [`ConversationStore::append_tool_artifact`].
    fn append_tool_artifact_dyn<'a>(
        &'a self,
        conv_id: &'a str,
        name: &'a str,
        payload: serde_json::Value,
    ) -> StoreFuture<'a, ()>;
}

impl<T: ConversationStore> ErasedConversationStore for T {
    fn save_turn_dyn<'a>(&'a self, conv_id: &'a str, turn: Turn) -> StoreFuture<'a, ()> {
        Box::pin(self.save_turn(conv_id, turn))
    }

    fn load_context_dyn<'a>(&'a self, conv_id: &'a str, k: i64) -> StoreFuture<'a, Vec<Turn>> {
        Box::pin(self.load_context(conv_id, k))
    }

    fn append_tool_artifact_dyn<'a>(
        &'a self,
        conv_id: &'a str,
        name: &'a str,
        payload: serde_json::Value,
    ) -> StoreFuture<'a, ()> {
        Box::pin(self.append_tool_artifact(conv_id, name, payload))
    }
}
