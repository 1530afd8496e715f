//! Streaming chunk delivery for [`Provider::complete_stream`](crate::Provider::complete_stream).

use std::fmt;
use std::pin::Pin;

use futures::Stream;

use crate::types::CompletionChunk;

/// Error information carried on the stream's error path.
#[derive(Debug, Clone)]
pub struct StreamError {
    /// Human-readable error message.
    pub message: String,
    /// Whether retrying the whole request might succeed.
    pub is_retryable: bool,
}

impl StreamError {
    /// Build a non-retryable stream error.
    #[must_use]
    pub fn non_retryable(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_retryable: false }
    }

    /// Build a retryable stream error.
    #[must_use]
    pub fn retryable(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_retryable: true }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StreamError {}

/// One event on a provider's streaming channel.
///
/// Narrower than a full content-block model: this harness only needs a text
/// delta, an optional chunk-level tool-call batch, usage, and a terminal
/// marker — the streaming aggregator (`conduit-orchestrator`) does the rest.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A chunk of the underlying completion.
    Chunk(CompletionChunk),
    /// The stream ended with an error.
    Error(StreamError),
}

/// Handle to a streaming completion. Consume with `StreamExt::next()`.
pub struct StreamHandle {
    /// The underlying event stream.
    pub receiver: Pin<Box<dyn Stream<Item = StreamEvent> + Send>>,
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}
