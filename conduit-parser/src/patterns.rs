//! The three tool-call recognition patterns, tried in order by
//! [`crate::extract_tool_calls`].

use std::sync::LazyLock;

use conduit_types::ToolCall;
use regex::Regex;
use serde_json::Value;

use crate::balanced::balanced_candidates;
use crate::repair::repair_json;

/// Parse a JSON value from `text`, falling back to the repair pass.
fn parse_or_repair(text: &str) -> Option<Value> {
    serde_json::from_str(text)
        .ok()
        .or_else(|| serde_json::from_str(&repair_json(text)).ok())
}

/// Pattern (a): a JSON array of `{name, arguments}` objects.
pub(crate) fn array_of_name_arguments(text: &str) -> Option<Vec<ToolCall>> {
    for candidate in balanced_candidates(text) {
        if !candidate.starts_with('[') {
            continue;
        }
        let Some(Value::Array(items)) = parse_or_repair(candidate) else {
            continue;
        };
        let mut calls = Vec::new();
        for item in &items {
            let Some(name) = item.get("name").and_then(Value::as_str) else {
                continue;
            };
            let args = item.get("arguments").cloned().unwrap_or(Value::Null);
            calls.push(ToolCall { name: name.to_string(), args });
        }
        if !calls.is_empty() {
            return Some(calls);
        }
    }
    None
}

static IDENT_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\(").expect("static regex"));

/// Pattern (b): `identifier({...})` function-call style.
pub(crate) fn function_call_style(text: &str) -> Option<Vec<ToolCall>> {
    let mut calls = Vec::new();
    for m in IDENT_PAREN.find_iter(text) {
        let name = m.as_str().trim_end_matches('(');
        let rest = &text[m.end()..];
        let Some(obj_start) = rest.find('{') else { continue };
        // Require the object to start at (or right after optional
        // whitespace from) the opening paren.
        if !rest[..obj_start].trim().is_empty() {
            continue;
        }
        let Some(candidate) = balanced_candidates(&rest[obj_start..]).into_iter().next() else {
            continue;
        };
        let Some(parsed) = parse_or_repair(candidate) else { continue };
        if parsed.is_object() {
            calls.push(ToolCall { name: name.to_string(), args: parsed });
        }
    }
    if calls.is_empty() {
        None
    } else {
        Some(calls)
    }
}

/// Pattern (c): an OpenAI-style `{"tool_calls":[{"function":{...}}]}` envelope.
pub(crate) fn openai_envelope(text: &str) -> Option<Vec<ToolCall>> {
    for candidate in balanced_candidates(text) {
        if !candidate.starts_with('{') {
            continue;
        }
        let Some(value) = parse_or_repair(candidate) else { continue };
        let Some(tool_calls) = value.get("tool_calls").and_then(Value::as_array) else {
            continue;
        };
        let mut calls = Vec::new();
        for entry in tool_calls {
            let Some(function) = entry.get("function") else { continue };
            let Some(name) = function.get("name").and_then(Value::as_str) else { continue };
            let args = match function.get("arguments") {
                Some(Value::String(s)) => parse_or_repair(s).unwrap_or(Value::Null),
                Some(other) => other.clone(),
                None => Value::Null,
            };
            calls.push(ToolCall { name: name.to_string(), args });
        }
        if !calls.is_empty() {
            return Some(calls);
        }
    }
    None
}
