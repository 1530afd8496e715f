//! The real [`Tracer`], backed by the `tracing` crate.

use std::time::Instant;

use crate::context::TraceContext;
use crate::tracer::{SpanFinish, Tracer};

fn attrs_json(attrs: &[(&str, String)]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = attrs
        .iter()
        .map(|(k, v)| ((*k).to_string(), serde_json::Value::String(v.clone())))
        .collect();
    serde_json::Value::Object(map).to_string()
}

/// A [`Tracer`] that emits `tracing` spans and events.
///
/// Every span uses the fixed span name `conduit.span`; the caller-supplied
/// name is carried in the `otel.name` field instead (see the module-level
/// doc for why). Compose with any `tracing-subscriber` layer to get stdout
/// logs, or `tracing-opentelemetry` to export as real OTel spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTracer;

impl TracingTracer {
    /// Create a new tracer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Tracer for TracingTracer {
    fn start_span(&self, _ctx: &TraceContext, name: &str, attrs: &[(&str, String)]) -> (TraceContext, SpanFinish) {
        let attrs = attrs_json(attrs);
        let span = tracing::info_span!("conduit.span", otel.name = %name, attrs = %attrs);
        {
            let _entered = span.enter();
            tracing::debug!("span_start");
        }
        (
            TraceContext { span: Some(span.clone()) },
            SpanFinish { span, start: Instant::now() },
        )
    }

    fn event(&self, ctx: &TraceContext, name: &str, attrs: &[(&str, String)]) {
        let attrs = attrs_json(attrs);
        match &ctx.span {
            Some(span) => {
                let _entered = span.enter();
                tracing::debug!(event = name, attrs, "conduit.event");
            }
            None => tracing::debug!(event = name, attrs, "conduit.event"),
        }
    }
}
