//! A tracer that discards everything, for tests and disabled tracing.

use std::time::Instant;

use crate::context::TraceContext;
use crate::tracer::{SpanFinish, Tracer};

/// A [`Tracer`] that performs no logging at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl NoopTracer {
    /// Create a new no-op tracer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Tracer for NoopTracer {
    fn start_span(&self, ctx: &TraceContext, _name: &str, _attrs: &[(&str, String)]) -> (TraceContext, SpanFinish) {
        (
            ctx.clone(),
            SpanFinish {
                span: tracing::Span::none(),
                start: Instant::now(),
            },
        )
    }

    fn event(&self, _ctx: &TraceContext, _name: &str, _attrs: &[(&str, String)]) {}
}
