//! The context value threaded through a span's lifetime.

/// Carries the current span's logger, if one is active.
///
/// Cheap to clone (an `Option<tracing::Span>` is a refcounted handle).
/// Immutable once created — `start_span` returns a new, derived context
/// rather than mutating the one it was given.
#[derive(Debug, Clone, Default)]
pub struct TraceContext {
    pub(crate) span: Option<tracing::Span>,
}

impl TraceContext {
    /// A context with no active span; events logged through it use the
    /// root (ambient) subscriber.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }
}
