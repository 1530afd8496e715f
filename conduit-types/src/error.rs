//! Error taxonomy for every conduit crate, plus the boundary [`HarnessError`].

/// Errors from provider (model backend) calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network-level error (connection reset, DNS failure, etc.).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Request timed out.
    #[error("timeout after {0:?}")]
    Timeout(std::time::Duration),
    /// Authentication/authorization failure.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Malformed or invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Error during streaming.
    #[error("stream error: {0}")]
    StreamError(String),
    /// Any other provider error.
    #[error("provider error: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Whether this error is likely transient and the call can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

/// Errors from tool execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool registered under this name.
    #[error("unknown tool: {0}")]
    NotFound(String),
    /// Tool input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The tool ran and returned an error.
    #[error("execution failed: {0}")]
    ExecutionFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The tool did not finish within `policy.tool_timeout`.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
    /// Execution was cancelled via the request's cancellation token.
    #[error("cancelled")]
    Cancelled,
}

/// Errors from the LRU cache adapter.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Value failed to serialize/deserialize.
    #[error("encoding error: {0}")]
    Encoding(String),
    /// The underlying backend failed (only relevant for non-in-memory caches).
    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors from the rate limiter.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// The bucket has no tokens available.
    #[error("rate limit exceeded for key: {0}")]
    Exhausted(String),
}

/// Errors from the conversation store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No such conversation.
    #[error("conversation not found: {0}")]
    NotFound(String),
    /// Serialization/deserialization of a turn failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// I/O error from a filesystem-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from guardrail checks, used internally before being folded into
/// [`HarnessError::GuardrailViolation`].
#[derive(Debug, thiserror::Error)]
pub enum GuardrailError {
    /// A tripwire guardrail rejected the input or output.
    #[error("{0}")]
    Tripwire(String),
    /// JSON-schema validation failed; carries the concatenated error list.
    #[error("schema validation failed: {}", .0.join("; "))]
    SchemaValidation(Vec<String>),
}

/// The boundary error returned by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The rate limiter denied a permit.
    #[error("rate limited")]
    RateLimited,
    /// The provider call failed.
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),
    /// A tool invocation failed.
    #[error("tool {name} failed: {source}")]
    Tool {
        /// Name of the tool that failed.
        name: String,
        /// Underlying error.
        #[source]
        source: ToolError,
    },
    /// A tool call named a tool absent from the registry.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// The tool-calling loop exceeded `policy.max_iterations`.
    #[error("max iterations exceeded ({0})")]
    MaxIterationsExceeded(usize),
    /// The tool-calling loop exceeded `policy.max_tool_depth`.
    #[error("max tool depth exceeded ({0})")]
    MaxDepthExceeded(usize),
    /// A guardrail tripwire rejected the input or output.
    #[error("guardrail violation: {0}")]
    GuardrailViolation(String),
    /// JSON-schema validation failed.
    #[error("schema validation failed: {}", .0.join("; "))]
    SchemaValidationError(Vec<String>),
    /// The cache backend failed (never fatal in practice; see orchestrator).
    #[error("cache error: {0}")]
    CacheError(#[from] CacheError),
    /// The conversation store failed (never fatal in practice; see orchestrator).
    #[error("store error: {0}")]
    StoreError(#[from] StoreError),
    /// The request was cancelled or timed out.
    #[error("cancelled or timed out")]
    CancelledOrTimedOut,
}

impl From<GuardrailError> for HarnessError {
    fn from(err: GuardrailError) -> Self {
        match err {
            GuardrailError::Tripwire(reason) => HarnessError::GuardrailViolation(reason),
            GuardrailError::SchemaValidation(errors) => HarnessError::SchemaValidationError(errors),
        }
    }
}

impl From<RateLimitError> for HarnessError {
    fn from(_: RateLimitError) -> Self {
        HarnessError::RateLimited
    }
}
