#![deny(missing_docs)]
//! Extracts tool calls and JSON values from free-form model text.
//!
//! The model is not trusted to emit well-formed structured output, so
//! extraction tries three recognition patterns in order and applies a
//! lenient repair pass before giving up on a candidate. Never executes or
//! validates the extracted tool *name* against a registry — that is the
//! orchestrator's job.

mod balanced;
mod patterns;
mod repair;

pub use repair::repair_json;

use conduit_types::ToolCall;

/// Try each recognition pattern in order, returning the first that yields
/// at least one tool call. Unparseable candidates within a pattern are
/// dropped silently rather than failing the whole extraction.
#[must_use]
pub fn extract_tool_calls(text: &str) -> Vec<ToolCall> {
    if let Some(calls) = patterns::array_of_name_arguments(text) {
        if !calls.is_empty() {
            return calls;
        }
    }
    if let Some(calls) = patterns::function_call_style(text) {
        if !calls.is_empty() {
            return calls;
        }
    }
    if let Some(calls) = patterns::openai_envelope(text) {
        if !calls.is_empty() {
            return calls;
        }
    }
    Vec::new()
}

/// Return the first well-formed JSON object or array found in `text`, after
/// the same repair step used for tool-call arguments.
#[must_use]
pub fn extract_json(text: &str) -> Option<serde_json::Value> {
    for candidate in balanced::balanced_candidates(text) {
        if let Ok(value) = serde_json::from_str(candidate) {
            return Some(value);
        }
        let repaired = repair_json(candidate);
        if let Ok(value) = serde_json::from_str(&repaired) {
            return Some(value);
        }
    }
    None
}
