#![deny(missing_docs)]
//! Configuration and builder wiring for the conduit orchestration harness.
//!
//! [`HarnessConfig`] is the plain, serde-deserializable shape;
//! [`OrchestratorBuilder`] resolves it into an
//! [`conduit_orchestrator::Orchestrator`], substituting no-op fallbacks
//! (`NoopTracer`, no cache, no rate limiter, no store) for whichever
//! capabilities are disabled.

mod builder;
mod config;

pub use builder::OrchestratorBuilder;
pub use config::HarnessConfig;
