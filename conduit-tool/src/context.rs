//! Runtime context handed to tools during execution.

use tokio_util::sync::CancellationToken;

/// Per-call context threaded through tool invocation.
///
/// Carries the cooperative-cancellation token the orchestrator derives from
/// the request's cancellation token (see the concurrency model: cancelling
/// the outer request also aborts pending tools).
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Session or conversation identifier, for tools that want to scope
    /// side effects (logging, rate limiting) to the caller.
    pub session_id: String,
    /// Token for cooperative cancellation.
    pub cancellation_token: CancellationToken,
}

impl ToolContext {
    /// Build a context for the given session, with a fresh cancellation token.
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Derive a child context that cancels when either this context or the
    /// child's own token is cancelled.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            session_id: self.session_id.clone(),
            cancellation_token: self.cancellation_token.child_token(),
        }
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new(String::new())
    }
}
