//! The `Tracer` capability contract.

use std::time::Instant;

use crate::context::TraceContext;

/// Span and event emission, independent of the concrete logging backend.
pub trait Tracer: Send + Sync {
    /// Start a span named `name` with the given attributes, derived from
    /// `ctx`.
    ///
    /// Returns a child context carrying the new span's logger (so nested
    /// calls made with the returned context attribute to this span), and a
    /// [`SpanFinish`] the caller must call exactly once to close the span.
    fn start_span(&self, ctx: &TraceContext, name: &str, attrs: &[(&str, String)]) -> (TraceContext, SpanFinish);

    /// Log an event named `name`, using `ctx`'s span logger if present,
    /// otherwise the root logger.
    fn event(&self, ctx: &TraceContext, name: &str, attrs: &[(&str, String)]);
}

/// Closes the span it was created for. Holds the elapsed start time so
/// `finish` can report span duration.
#[must_use = "a span that is never finished never emits span_end"]
pub struct SpanFinish {
    pub(crate) span: tracing::Span,
    pub(crate) start: Instant,
}

impl SpanFinish {
    /// Close the span, emitting `span_end` with the elapsed duration and,
    /// if given, the error that ended it.
    pub fn finish(self, err: Option<&(dyn std::error::Error + 'static)>) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let _entered = self.span.enter();
        match err {
            Some(e) => tracing::warn!(elapsed_ms, error = %e, "span_end"),
            None => tracing::debug!(elapsed_ms, "span_end"),
        }
    }
}
