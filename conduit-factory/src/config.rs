//! [`HarnessConfig`]: the plain, serde-deserializable configuration surface
//! consumed by [`crate::OrchestratorBuilder`].
//!
//! A struct-plus-builder, not a config-loading subsystem — loading
//! `HarnessConfig` from a file or environment is left to the caller; this
//! crate only defines the shape and resolves it into a running
//! orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Recognized configuration options, all optional with defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Whether the response cache is consulted and populated.
    pub cache_enabled: bool,
    /// Maximum number of entries the LRU cache holds.
    pub cache_capacity: usize,
    /// Default TTL applied to entries written by the orchestrator.
    pub cache_ttl_seconds: u64,
    /// Whether the rate limiter gates orchestration calls.
    pub rate_limit_enabled: bool,
    /// Per-key token-bucket capacity.
    pub rate_limit_capacity: u32,
    /// Refill interval, in milliseconds (one token credited per interval).
    pub rate_limit_refill_rate_ms: u64,
    /// Maximum tool-execution rounds per orchestration, clamped to `[1, 10]`.
    pub max_tool_depth: usize,
    /// Maximum provider calls per orchestration, clamped to `[1, 50]`.
    pub max_iterations: usize,
    /// Maximum size, in bytes, of a tool or completion output.
    pub max_output_size: usize,
    /// Whether tool-call and output guardrails run at all.
    pub enable_guardrails: bool,
    /// Case-insensitive substrings that trip the output and tool-call
    /// guardrails.
    pub blocked_words: Vec<String>,
    /// Tool names the tool-call guardrail allows. Empty means "allow all" —
    /// the product default (distinct from
    /// [`conduit_guardrails::ToolCallValidator::with_allowlist`]'s own
    /// "empty allowlist rejects everything" rule: the factory is what
    /// translates config's "empty ⇒ allow all" into the validator's
    /// `allow_all` constructor).
    pub allowed_tools: Vec<String>,
    /// Whether the tracer emits real spans (`TracingTracer`) or is a no-op.
    pub enable_tracing: bool,
    /// Maximum number of tool calls executed concurrently per round.
    pub tool_concurrency: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_capacity: 1000,
            cache_ttl_seconds: 3600,
            rate_limit_enabled: true,
            rate_limit_capacity: 10,
            rate_limit_refill_rate_ms: 1000,
            max_tool_depth: 3,
            max_iterations: 10,
            max_output_size: 10_000,
            enable_guardrails: true,
            blocked_words: Vec::new(),
            allowed_tools: Vec::new(),
            enable_tracing: true,
            tool_concurrency: 5,
        }
    }
}

impl HarnessConfig {
    /// The rate limiter's refill interval as a [`Duration`].
    #[must_use]
    pub fn rate_limit_refill_rate(&self) -> Duration {
        Duration::from_millis(self.rate_limit_refill_rate_ms)
    }

    /// The cache's default entry TTL as a [`Duration`].
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Build a [`conduit_types::Policy`] from this config's depth/iteration
    /// limits, using [`conduit_types::Policy`]'s own clamping.
    #[must_use]
    pub fn default_policy(&self) -> conduit_types::Policy {
        conduit_types::Policy::new(
            self.max_tool_depth,
            self.max_iterations,
            Duration::from_secs(30),
            false,
            false,
            2,
            Duration::from_millis(100),
        )
    }
}
