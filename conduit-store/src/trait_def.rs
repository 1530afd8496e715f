//! The `ConversationStore` capability contract.

use std::future::Future;

use conduit_types::{StoreError, Turn};

/// Append-only persistence for a conversation's turns.
pub trait ConversationStore: Send + Sync {
    /// Append `turn` to `conv_id`'s history.
    ///
    /// Implementations must accept duplicate saves of an identical
    /// `(conv_id, turn)` pair idempotently (no duplicate entry), so callers
    /// that replay a turn after a crash don't double-record it.
    fn save_turn(&self, conv_id: &str, turn: Turn) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Load the last `k` turns for `conv_id`, oldest first.
    ///
    /// `k <= 0`, or a `k` exceeding the stored count, returns every turn.
    fn load_context(
        &self,
        conv_id: &str,
        k: i64,
    ) -> impl Future<Output = Result<Vec<Turn>, StoreError>> + Send;

    /// Persist a synthesized `tool`-role turn describing a tool execution.
    ///
    /// Default implementation wraps `{name, payload}` as the turn content
    /// and delegates to [`ConversationStore::save_turn`]; backends rarely
    /// need to override this.
    fn append_tool_artifact(
        &self,
        conv_id: &str,
        name: &str,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        async move {
            let content = serde_json::json!({ "name": name, "payload": payload }).to_string();
            let turn = Turn {
                role: conduit_types::Role::Tool,
                content,
                created_at: chrono::Utc::now(),
            };
            self.save_turn(conv_id, turn).await
        }
    }
}
