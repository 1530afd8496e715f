//! Tool-call validation: allowlist, empty name, and blocked words in args.

use std::collections::HashSet;

use conduit_types::ToolCall;

use crate::result::GuardrailResult;

/// Validates a tool call's name against an allowlist and its stringified
/// args against a blocked-word list.
pub struct ToolCallValidator {
    /// Allowed tool names. `None` means "allow all" — the product default.
    /// `Some(empty set)` rejects every call: a way for an operator to lock
    /// tool use out entirely.
    allowlist: Option<HashSet<String>>,
    blocked_words: Vec<String>,
}

impl ToolCallValidator {
    /// Create a validator that allows every tool name, rejecting only on
    /// empty names or blocked words in args.
    #[must_use]
    pub fn allow_all(blocked_words: Vec<String>) -> Self {
        Self { allowlist: None, blocked_words }
    }

    /// Create a validator that only allows the given tool names.
    #[must_use]
    pub fn with_allowlist(allowed: impl IntoIterator<Item = String>, blocked_words: Vec<String>) -> Self {
        Self {
            allowlist: Some(allowed.into_iter().collect()),
            blocked_words,
        }
    }

    /// Check a single tool call.
    #[must_use]
    pub fn check(&self, call: &ToolCall) -> GuardrailResult {
        if call.name.is_empty() {
            return GuardrailResult::Tripwire("tool call has an empty name".to_string());
        }

        if let Some(allowlist) = &self.allowlist {
            if !allowlist.contains(&call.name) {
                return GuardrailResult::Tripwire(format!("tool {} is not in the allowlist", call.name));
            }
        }

        let args_text = call.args.to_string();
        let lower = args_text.to_lowercase();
        for word in &self.blocked_words {
            if lower.contains(&word.to_lowercase()) {
                return GuardrailResult::Tripwire(format!("tool call args contain blocked word: {word}"));
            }
        }

        GuardrailResult::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall { name: name.to_string(), args }
    }

    #[test]
    fn empty_name_is_rejected() {
        let v = ToolCallValidator::allow_all(vec![]);
        assert!(v.check(&call("", json!({}))).is_tripwire());
    }

    #[test]
    fn allow_all_accepts_any_name() {
        let v = ToolCallValidator::allow_all(vec![]);
        assert_eq!(v.check(&call("search", json!({}))), GuardrailResult::Pass);
    }

    #[test]
    fn allowlist_rejects_unlisted_tool() {
        let v = ToolCallValidator::with_allowlist(["search".to_string()], vec![]);
        assert!(v.check(&call("delete_everything", json!({}))).is_tripwire());
        assert_eq!(v.check(&call("search", json!({}))), GuardrailResult::Pass);
    }

    #[test]
    fn empty_allowlist_rejects_everything() {
        let v = ToolCallValidator::with_allowlist(Vec::<String>::new(), vec![]);
        assert!(v.check(&call("search", json!({}))).is_tripwire());
    }

    #[test]
    fn blocked_word_in_args_is_rejected_case_insensitively() {
        let v = ToolCallValidator::allow_all(vec!["secret".to_string()]);
        assert!(v.check(&call("search", json!({"q": "find the SECRET file"}))).is_tripwire());
    }
}
