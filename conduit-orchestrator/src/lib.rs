#![deny(missing_docs)]
//! The tool-calling state machine at the center of the harness.
//!
//! [`Orchestrator`] drives a [`conduit_types::Provider`] through the
//! iterative "call the model, detect tool calls, execute them, call the
//! model again" loop (blocking via [`Orchestrator::orchestrate`], streaming
//! via [`Orchestrator::orchestrate_stream`], or turn-by-turn via
//! [`Orchestrator::run_step`]), composing the cache, rate limiter,
//! conversation store, tracer, and guardrail crates around it, generic over
//! `Orchestrator<P: Provider>` rather than any one concrete provider.

mod aggregator;
mod cache_key;
mod orchestrator;
mod response;
mod step;
mod tool_exec;

pub use aggregator::StreamingAggregator;
pub use cache_key::compute_cache_key;
pub use orchestrator::Orchestrator;
pub use response::OrchestratorResponse;
pub use step::{StepIterator, TurnResult};
pub use tool_exec::{execute_tools, ToolBatchResult, ToolOutcome, DEFAULT_TOOL_CONCURRENCY};
