//! [`OrchestratorBuilder`]: fluent construction of an [`Orchestrator`] from a
//! [`HarnessConfig`], substituting no-op fallbacks where a capability is
//! disabled: a required provider, consuming `self` setters, and a terminal
//! `.build()`.

use std::sync::Arc;

use conduit_cache::{Cache, LruCache};
use conduit_guardrails::{OutputGuardrail, PolicyValidator, ToolCallValidator};
use conduit_orchestrator::Orchestrator;
use conduit_ratelimit::RateLimiter;
use conduit_store::ErasedConversationStore;
use conduit_trace::{NoopTracer, Tracer, TracingTracer};
use conduit_types::Provider;

use crate::config::HarnessConfig;

/// Builds an [`Orchestrator<P>`] from a provider and a [`HarnessConfig`].
///
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new(provider)
///     .config(HarnessConfig::default())
///     .store(Arc::new(MemoryStore::new()))
///     .build();
/// ```
pub struct OrchestratorBuilder<P: Provider> {
    provider: P,
    config: HarnessConfig,
    store: Option<Arc<dyn ErasedConversationStore>>,
}

impl<P: Provider> OrchestratorBuilder<P> {
    /// Start a builder for the given provider, with default configuration
    /// and no conversation store.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider, config: HarnessConfig::default(), store: None }
    }

    /// Replace the entire configuration.
    #[must_use]
    pub fn config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a conversation store. Without one, turns are not persisted.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn ErasedConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override `cache_enabled`/`cache_capacity`.
    #[must_use]
    pub fn cache(mut self, enabled: bool, capacity: usize) -> Self {
        self.config.cache_enabled = enabled;
        self.config.cache_capacity = capacity;
        self
    }

    /// Override `rate_limit_enabled`/`rate_limit_capacity`/`rate_limit_refill_rate_ms`.
    #[must_use]
    pub fn rate_limit(mut self, enabled: bool, capacity: u32, refill_rate_ms: u64) -> Self {
        self.config.rate_limit_enabled = enabled;
        self.config.rate_limit_capacity = capacity;
        self.config.rate_limit_refill_rate_ms = refill_rate_ms;
        self
    }

    /// Override `allowed_tools`.
    #[must_use]
    pub fn allowed_tools(mut self, allowed: Vec<String>) -> Self {
        self.config.allowed_tools = allowed;
        self
    }

    /// Override `blocked_words`.
    #[must_use]
    pub fn blocked_words(mut self, blocked: Vec<String>) -> Self {
        self.config.blocked_words = blocked;
        self
    }

    /// Override `enable_guardrails`.
    #[must_use]
    pub fn enable_guardrails(mut self, enabled: bool) -> Self {
        self.config.enable_guardrails = enabled;
        self
    }

    /// Override `enable_tracing`.
    #[must_use]
    pub fn enable_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Override `tool_concurrency`.
    #[must_use]
    pub fn tool_concurrency(mut self, concurrency: usize) -> Self {
        self.config.tool_concurrency = concurrency;
        self
    }

    /// Resolve configuration into concrete collaborators and build the
    /// orchestrator.
    #[must_use]
    pub fn build(self) -> Orchestrator<P> {
        let cfg = &self.config;

        let cache: Option<Arc<dyn Cache>> =
            if cfg.cache_enabled { Some(Arc::new(LruCache::new(cfg.cache_capacity))) } else { None };

        let rate_limiter: Option<Arc<RateLimiter>> = if cfg.rate_limit_enabled {
            Some(RateLimiter::new(cfg.rate_limit_capacity, cfg.rate_limit_refill_rate()))
        } else {
            None
        };

        let tracer: Arc<dyn Tracer> =
            if cfg.enable_tracing { Arc::new(TracingTracer::new()) } else { Arc::new(NoopTracer::new()) };

        // Config's "empty allowed_tools means allow all" is the opposite of
        // the validator's own "empty allowlist rejects everything" rule, so
        // the empty case routes to `allow_all` rather than `with_allowlist`.
        let tool_call_validator = if cfg.allowed_tools.is_empty() {
            ToolCallValidator::allow_all(cfg.blocked_words.clone())
        } else {
            ToolCallValidator::with_allowlist(cfg.allowed_tools.clone(), cfg.blocked_words.clone())
        };

        let output_guardrail = OutputGuardrail::with_defaults(cfg.blocked_words.clone());
        let policy_validator = PolicyValidator::with_max_output_size(cfg.max_output_size);

        Orchestrator::new(
            self.provider,
            cache,
            rate_limiter,
            self.store,
            tracer,
            tool_call_validator,
            output_guardrail,
            policy_validator,
            cfg.enable_guardrails,
            cfg.tool_concurrency,
        )
    }
}
