//! Output validation and sanitization: blocked words and sensitive-data
//! regex patterns.

use regex::Regex;

use crate::result::GuardrailResult;

/// Default sensitive-data patterns, matched case-insensitively: a
/// `password`/`api_key`/`api-key`/`apikey`/`secret` label followed by a
/// separator and a run of non-whitespace.
pub const DEFAULT_SENSITIVE_PATTERNS: &[&str] = &[
    r"(?i)password\s*[:=]\s*\S+",
    r"(?i)api[_-]?key\s*[:=]\s*\S+",
    r"(?i)secret\s*[:=]\s*\S+",
];

/// Validates and sanitizes model output against blocked words and
/// sensitive-data patterns.
pub struct OutputGuardrail {
    blocked_words: Vec<String>,
    patterns: Vec<Regex>,
}

impl OutputGuardrail {
    /// Build a guardrail from blocked words and regex pattern strings.
    ///
    /// # Panics
    ///
    /// Panics if a pattern fails to compile — patterns are expected to be
    /// fixed configuration, validated at startup.
    #[must_use]
    pub fn new(blocked_words: Vec<String>, patterns: &[&str]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).expect("sensitive-data pattern must compile"))
            .collect();
        Self { blocked_words, patterns }
    }

    /// Build a guardrail using [`DEFAULT_SENSITIVE_PATTERNS`].
    #[must_use]
    pub fn with_defaults(blocked_words: Vec<String>) -> Self {
        Self::new(blocked_words, DEFAULT_SENSITIVE_PATTERNS)
    }

    /// Reject text containing a blocked word or matching a sensitive-data
    /// pattern.
    #[must_use]
    pub fn validate(&self, text: &str) -> GuardrailResult {
        let lower = text.to_lowercase();
        for word in &self.blocked_words {
            if lower.contains(&word.to_lowercase()) {
                return GuardrailResult::Tripwire(format!("output contains blocked word: {word}"));
            }
        }
        for pattern in &self.patterns {
            if pattern.is_match(text) {
                return GuardrailResult::Tripwire(format!("output matches sensitive-data pattern: {pattern}"));
            }
        }
        GuardrailResult::Pass
    }

    /// Replace every match of every sensitive-data pattern with
    /// `[REDACTED]`, without rejecting the text.
    #[must_use]
    pub fn sanitize(&self, text: &str) -> String {
        let mut result = text.to_string();
        for pattern in &self.patterns {
            result = pattern.replace_all(&result, "[REDACTED]").into_owned();
        }
        result
    }
}
