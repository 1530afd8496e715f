#![deny(missing_docs)]
//! Span and event tracing, adapted onto the [`tracing`] crate.
//!
//! A dynamic-name span can't be a real `tracing` span name (span names must
//! be `&'static str` literals), so [`TracingTracer`] follows the
//! `tracing-opentelemetry` convention of a fixed span name carrying the
//! real name in an `otel.name` field — any OTel exporter layered on top
//! renames the span from that field automatically.

mod context;
mod noop;
mod tracer;
mod tracing_impl;

pub use context::TraceContext;
pub use noop::NoopTracer;
pub use tracer::{SpanFinish, Tracer};
pub use tracing_impl::TracingTracer;
