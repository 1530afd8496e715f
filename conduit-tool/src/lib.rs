#![deny(missing_docs)]
//! Tool interface and registry.
//!
//! Defines [`ToolDyn`] for object-safe tool abstraction and [`ToolRegistry`]
//! for the per-request collection the orchestrator dispatches into. A
//! registry is built fresh per request from whatever tools the caller
//! supplies — the core never shares mutable tool state across invocations.

mod context;
mod middleware;
mod registry;

pub use context::ToolContext;
pub use middleware::{tool_middleware_fn, Next, ToolMiddleware};
pub use registry::{ToolDyn, ToolRegistry};
