//! The tool-calling state machine: [`Orchestrator::orchestrate`] (non-streaming)
//! and [`Orchestrator::orchestrate_stream`] (streaming), sharing one loop body.

use std::sync::Arc;
use std::time::Duration;

use conduit_cache::Cache;
use conduit_context::PromptBuilder;
use conduit_guardrails::{GuardrailResult, OutputGuardrail, PolicyValidator, ToolCallValidator};
use conduit_ratelimit::RateLimiter;
use conduit_store::ErasedConversationStore;
use conduit_tool::{ToolContext, ToolRegistry};
use conduit_trace::{TraceContext, Tracer};
use conduit_types::{
    Completion, HarnessError, PromptMessage, ProviderOptions, Request, Role, StreamEvent,
    ToolCall, ToolChoice,
};
use conduit_types::Provider;
use tokio::sync::{mpsc, oneshot};

use crate::aggregator::StreamingAggregator;
use crate::cache_key::compute_cache_key;
use crate::response::OrchestratorResponse;
use crate::tool_exec::{execute_tools, DEFAULT_TOOL_CONCURRENCY};

const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Drives the iterative tool-calling loop against a [`Provider`], composing
/// every other adapter in this harness around it.
///
/// Every collaborator but the provider is optional: a missing cache, rate
/// limiter, store, or tracer degrades gracefully rather than failing the
/// request. `conduit-factory` is the intended caller, responsible for
/// substituting the concrete no-op fallbacks when a capability is disabled.
pub struct Orchestrator<P: Provider> {
    provider: P,
    cache: Option<Arc<dyn Cache>>,
    rate_limiter: Option<Arc<RateLimiter>>,
    store: Option<Arc<dyn ErasedConversationStore>>,
    tracer: Arc<dyn Tracer>,
    tool_call_validator: ToolCallValidator,
    output_guardrail: OutputGuardrail,
    policy_validator: PolicyValidator,
    enable_guardrails: bool,
    tool_concurrency: usize,
}

impl<P: Provider> Orchestrator<P> {
    /// Construct an orchestrator from its fully-resolved collaborators.
    /// `conduit-factory` is the intended caller; it is responsible for
    /// resolving [`crate::HarnessConfig`]-shaped configuration into these
    /// concrete values and no-op fallbacks.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider: P,
        cache: Option<Arc<dyn Cache>>,
        rate_limiter: Option<Arc<RateLimiter>>,
        store: Option<Arc<dyn ErasedConversationStore>>,
        tracer: Arc<dyn Tracer>,
        tool_call_validator: ToolCallValidator,
        output_guardrail: OutputGuardrail,
        policy_validator: PolicyValidator,
        enable_guardrails: bool,
        tool_concurrency: usize,
    ) -> Self {
        Self {
            provider,
            cache,
            rate_limiter,
            store,
            tracer,
            tool_call_validator,
            output_guardrail,
            policy_validator,
            enable_guardrails,
            tool_concurrency: if tool_concurrency == 0 { DEFAULT_TOOL_CONCURRENCY } else { tool_concurrency },
        }
    }

    /// Non-streaming orchestration: call the provider, execute any tool
    /// calls it makes, and repeat until it returns a final response or a
    /// limit is hit.
    ///
    /// # Errors
    ///
    /// Any variant of [`HarnessError`]: `RateLimited`, `Provider`,
    /// `MaxIterationsExceeded`, `MaxDepthExceeded`, `GuardrailViolation`,
    /// `SchemaValidationError`, `CancelledOrTimedOut`.
    pub async fn orchestrate(
        &self,
        req: &mut Request,
        tools: &ToolRegistry,
    ) -> Result<OrchestratorResponse, HarnessError> {
        let permit = match &self.rate_limiter {
            Some(rl) => Some(rl.acquire("orchestrate")?),
            None => None,
        };
        let result = self.orchestrate_inner(req, tools).await;
        if let Some(permit) = permit {
            permit.release();
        }
        result
    }

    async fn orchestrate_inner(
        &self,
        req: &mut Request,
        tools: &ToolRegistry,
    ) -> Result<OrchestratorResponse, HarnessError> {
        let attrs = [
            ("conversation_id", req.conversation.id.clone()),
            ("tool_count", req.tools.len().to_string()),
        ];
        let (span_ctx, finish) = self.tracer.start_span(&TraceContext::root(), "orchestrate", &attrs);

        let result = self.run(&span_ctx, req, tools).await;

        match &result {
            Ok(_) => finish.finish(None),
            Err(e) => finish.finish(Some(e)),
        }
        result
    }

    async fn run(
        &self,
        span_ctx: &TraceContext,
        req: &mut Request,
        tools: &ToolRegistry,
    ) -> Result<OrchestratorResponse, HarnessError> {
        let cache_key = compute_cache_key(req);

        if let Some(cache) = &self.cache {
            if let Some(bytes) = cache.get(&cache_key) {
                if let Ok(cached) = serde_json::from_slice::<OrchestratorResponse>(&bytes) {
                    self.tracer.event(span_ctx, "cache_hit", &[("key", cache_key.clone())]);
                    return Ok(cached);
                }
            }
        }

        let policy = req.policy.clone();
        let mut prompt_input = PromptBuilder::build(
            req.system.as_deref(),
            &req.conversation.messages,
            &req.context,
            tools.definitions(),
        );

        let mut iteration: usize = 0;
        let mut depth: usize = 0;

        let (final_text, final_usage) = loop {
            self.policy_validator.validate_iteration(iteration, &policy)?;

            let options = ProviderOptions {
                max_new_tokens: 1024,
                temperature: 0.7,
                top_p: 0.9,
                min_p: None,
                seed: if policy.deterministic && iteration == 0 { Some(42) } else { None },
                stop: Vec::new(),
                tool_choice: ToolChoice::Auto,
                timeout_ms: 30_000,
            };

            let call_attrs = [("iteration", iteration.to_string()), ("depth", depth.to_string())];
            let (_call_ctx, call_finish) =
                self.tracer.start_span(span_ctx, "provider_call", &call_attrs);

            let completion = tokio::select! {
                result = self.provider.complete(prompt_input.clone(), options) => {
                    match result {
                        Ok(c) => {
                            call_finish.finish(None);
                            c
                        }
                        Err(e) => {
                            let err = HarnessError::Provider(e);
                            call_finish.finish(Some(&err));
                            return Err(err);
                        }
                    }
                }
                () = req.cancellation_token.cancelled() => {
                    call_finish.finish(Some(&HarnessError::CancelledOrTimedOut));
                    return Err(HarnessError::CancelledOrTimedOut);
                }
            };
            iteration += 1;

            let tool_calls = detect_tool_calls(&completion);

            if tool_calls.is_empty() {
                break (completion.text, completion.usage);
            }

            self.policy_validator.validate_depth(depth, &policy)?;

            if self.enable_guardrails {
                self.check_tool_calls(&tool_calls)?;
            }

            let tool_ctx = ToolContext {
                session_id: req.conversation.id.clone(),
                cancellation_token: req.cancellation_token.child_token(),
            };
            let batch = execute_tools(tools, &tool_calls, self.tool_concurrency, policy.tool_timeout, &tool_ctx).await;

            if let Some((call, err)) = batch.first_failure() {
                self.tracer.event(
                    span_ctx,
                    "tool_failed",
                    &[("name", call.name.clone()), ("error", err.to_string())],
                );
            }

            req.conversation.messages.push(PromptMessage::new(Role::Assistant, completion.text.clone()));
            for (call, value) in batch.successes() {
                let content = self.sanitized_tool_content(value);
                req.conversation.messages.push(PromptMessage::new(Role::Tool, content.clone()));
                if let Some(store) = &self.store {
                    if let Err(e) = store
                        .append_tool_artifact_dyn(&req.conversation.id, &call.name, serde_json::Value::String(content))
                        .await
                    {
                        self.tracer.event(span_ctx, "store_write_failed", &[("error", e.to_string())]);
                    }
                }
            }

            depth += 1;
            prompt_input = PromptBuilder::build(
                req.system.as_deref(),
                &req.conversation.messages,
                &req.context,
                tools.definitions(),
            );
        };

        if self.enable_guardrails {
            if let GuardrailResult::Tripwire(reason) = self.output_guardrail.validate(&final_text) {
                return Err(HarnessError::GuardrailViolation(reason));
            }
            self.policy_validator.validate_output_size(final_text.len())?;
        }
        if policy.require_json_output && serde_json::from_str::<serde_json::Value>(&final_text).is_err() {
            return Err(HarnessError::SchemaValidationError(vec!["final output is not valid JSON".to_string()]));
        }

        let response = OrchestratorResponse { text: final_text, usage: final_usage };

        if let Some(cache) = &self.cache {
            if let Ok(bytes) = serde_json::to_vec(&response) {
                cache.set(&cache_key, bytes, CACHE_TTL);
            }
        }

        if let Some(store) = &self.store {
            let turn = conduit_types::Turn {
                role: Role::Assistant,
                content: response.text.clone(),
                created_at: chrono::Utc::now(),
            };
            if let Err(e) = store.save_turn_dyn(&req.conversation.id, turn).await {
                self.tracer.event(span_ctx, "store_write_failed", &[("error", e.to_string())]);
            }
        }

        Ok(response)
    }

    fn check_tool_calls(&self, calls: &[ToolCall]) -> Result<(), HarnessError> {
        for call in calls {
            if let GuardrailResult::Tripwire(reason) = self.tool_call_validator.check(call) {
                return Err(HarnessError::GuardrailViolation(reason));
            }
        }
        Ok(())
    }

    /// Begin a step-by-step drive of the loop, advanced one turn at a time
    /// via [`crate::step::StepIterator::next`]. Bypasses the cache and rate
    /// limiter (those gate the whole orchestration, not a single turn); the
    /// guardrails and policy validator still apply per turn.
    #[must_use]
    pub fn run_step<'a>(&'a self, req: &'a mut Request, tools: &'a ToolRegistry) -> crate::step::StepIterator<'a, P> {
        crate::step::StepIterator::new(self, req, tools)
    }

    pub(crate) fn policy_validator(&self) -> &PolicyValidator {
        &self.policy_validator
    }

    pub(crate) fn output_guardrail(&self) -> &OutputGuardrail {
        &self.output_guardrail
    }

    pub(crate) fn tool_call_validator(&self) -> &ToolCallValidator {
        &self.tool_call_validator
    }

    pub(crate) fn guardrails_enabled(&self) -> bool {
        self.enable_guardrails
    }

    pub(crate) fn tool_concurrency(&self) -> usize {
        self.tool_concurrency
    }

    pub(crate) fn provider(&self) -> &P {
        &self.provider
    }

    /// Streaming orchestration: the same loop as [`Self::orchestrate`], but
    /// each finalized completion is sent to the caller as soon as it's
    /// aggregated rather than all at once at the end.
    ///
    /// Spawns a dedicated producer task owning both channels. The error
    /// channel carries at most one value: `None` on success, `Some(err)` on
    /// failure.
    #[must_use]
    pub fn orchestrate_stream(
        self: &Arc<Self>,
        req: Request,
        tools: ToolRegistry,
    ) -> (mpsc::Receiver<Completion>, oneshot::Receiver<Option<HarnessError>>)
    where
        P: Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let (err_tx, err_rx) = oneshot::channel();
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = this.stream_producer(req, tools, tx).await;
            let _ = err_tx.send(outcome);
        });
        (rx, err_rx)
    }

    async fn stream_producer(
        &self,
        mut req: Request,
        tools: ToolRegistry,
        tx: mpsc::Sender<Completion>,
    ) -> Option<HarnessError> {
        let permit = match &self.rate_limiter {
            Some(rl) => match rl.acquire("orchestrate") {
                Ok(permit) => Some(permit),
                Err(e) => return Some(e.into()),
            },
            None => None,
        };

        let attrs = [
            ("conversation_id", req.conversation.id.clone()),
            ("tool_count", req.tools.len().to_string()),
        ];
        let (span_ctx, finish) = self.tracer.start_span(&TraceContext::root(), "orchestrate", &attrs);

        let result = self.run_stream(&span_ctx, &mut req, &tools, &tx).await;

        match &result {
            Ok(()) => finish.finish(None),
            Err(e) => finish.finish(Some(e)),
        }

        if let Some(permit) = permit {
            permit.release();
        }

        result.err()
    }

    async fn run_stream(
        &self,
        span_ctx: &TraceContext,
        req: &mut Request,
        tools: &ToolRegistry,
        tx: &mpsc::Sender<Completion>,
    ) -> Result<(), HarnessError> {
        let cache_key = compute_cache_key(req);

        if let Some(cache) = &self.cache {
            if let Some(bytes) = cache.get(&cache_key) {
                if let Ok(cached) = serde_json::from_slice::<OrchestratorResponse>(&bytes) {
                    self.tracer.event(span_ctx, "cache_hit", &[("key", cache_key.clone())]);
                    let _ = tx
                        .send(Completion { text: cached.text, tool_calls: Vec::new(), usage: cached.usage, done: true })
                        .await;
                    return Ok(());
                }
            }
        }

        let policy = req.policy.clone();
        let mut prompt_input = PromptBuilder::build(
            req.system.as_deref(),
            &req.conversation.messages,
            &req.context,
            tools.definitions(),
        );

        let mut iteration: usize = 0;
        let mut depth: usize = 0;

        let (final_text, final_usage) = loop {
            self.policy_validator.validate_iteration(iteration, &policy)?;

            let options = ProviderOptions {
                max_new_tokens: 1024,
                temperature: 0.7,
                top_p: 0.9,
                min_p: None,
                seed: if policy.deterministic && iteration == 0 { Some(42) } else { None },
                stop: Vec::new(),
                tool_choice: ToolChoice::Auto,
                timeout_ms: 30_000,
            };

            let call_attrs = [("iteration", iteration.to_string()), ("depth", depth.to_string())];
            let (_call_ctx, call_finish) =
                self.tracer.start_span(span_ctx, "provider_call", &call_attrs);

            let mut handle = tokio::select! {
                result = self.provider.complete_stream(prompt_input.clone(), options) => {
                    match result {
                        Ok(h) => { call_finish.finish(None); h }
                        Err(e) => {
                            let err = HarnessError::Provider(e);
                            call_finish.finish(Some(&err));
                            return Err(err);
                        }
                    }
                }
                () = req.cancellation_token.cancelled() => {
                    call_finish.finish(Some(&HarnessError::CancelledOrTimedOut));
                    return Err(HarnessError::CancelledOrTimedOut);
                }
            };

            let mut aggregator = StreamingAggregator::new();
            loop {
                use futures::StreamExt;
                let next = tokio::select! {
                    item = handle.receiver.next() => item,
                    () = req.cancellation_token.cancelled() => return Err(HarnessError::CancelledOrTimedOut),
                };
                match next {
                    Some(StreamEvent::Chunk(chunk)) => {
                        let done = chunk.done;
                        aggregator.push(&chunk);
                        if done {
                            break;
                        }
                    }
                    Some(StreamEvent::Error(e)) => {
                        return Err(HarnessError::Provider(conduit_types::ProviderError::StreamError(e.to_string())));
                    }
                    None => break,
                }
            }
            iteration += 1;

            let completion = aggregator.finalize();
            let _ = tx.send(completion.clone()).await;

            let tool_calls = detect_tool_calls(&completion);
            if tool_calls.is_empty() {
                break (completion.text, completion.usage);
            }

            self.policy_validator.validate_depth(depth, &policy)?;

            if self.enable_guardrails {
                self.check_tool_calls(&tool_calls)?;
            }

            let tool_ctx = ToolContext {
                session_id: req.conversation.id.clone(),
                cancellation_token: req.cancellation_token.child_token(),
            };
            let batch = execute_tools(tools, &tool_calls, self.tool_concurrency, policy.tool_timeout, &tool_ctx).await;

            if let Some((call, err)) = batch.first_failure() {
                self.tracer.event(
                    span_ctx,
                    "tool_failed",
                    &[("name", call.name.clone()), ("error", err.to_string())],
                );
            }

            req.conversation.messages.push(PromptMessage::new(Role::Assistant, completion.text.clone()));
            for (call, value) in batch.successes() {
                let content = self.sanitized_tool_content(value);
                req.conversation.messages.push(PromptMessage::new(Role::Tool, content.clone()));
                if let Some(store) = &self.store {
                    if let Err(e) = store
                        .append_tool_artifact_dyn(&req.conversation.id, &call.name, serde_json::Value::String(content))
                        .await
                    {
                        self.tracer.event(span_ctx, "store_write_failed", &[("error", e.to_string())]);
                    }
                }
            }

            depth += 1;
            prompt_input = PromptBuilder::build(
                req.system.as_deref(),
                &req.conversation.messages,
                &req.context,
                tools.definitions(),
            );
        };

        if self.enable_guardrails {
            if let GuardrailResult::Tripwire(reason) = self.output_guardrail.validate(&final_text) {
                return Err(HarnessError::GuardrailViolation(reason));
            }
            self.policy_validator.validate_output_size(final_text.len())?;
        }
        if policy.require_json_output && serde_json::from_str::<serde_json::Value>(&final_text).is_err() {
            return Err(HarnessError::SchemaValidationError(vec!["final output is not valid JSON".to_string()]));
        }

        let response = OrchestratorResponse { text: final_text, usage: final_usage };

        if let Some(cache) = &self.cache {
            if let Ok(bytes) = serde_json::to_vec(&response) {
                cache.set(&cache_key, bytes, CACHE_TTL);
            }
        }

        if let Some(store) = &self.store {
            let turn = conduit_types::Turn {
                role: Role::Assistant,
                content: response.text.clone(),
                created_at: chrono::Utc::now(),
            };
            if let Err(e) = store.save_turn_dyn(&req.conversation.id, turn).await {
                self.tracer.event(span_ctx, "store_write_failed", &[("error", e.to_string())]);
            }
        }

        Ok(())
    }

    /// Stringify a tool result and, when guardrails are enabled, redact any
    /// sensitive-data pattern matches before the content reaches the
    /// conversation or the store.
    fn sanitized_tool_content(&self, value: &serde_json::Value) -> String {
        let content = stringify_tool_result(value);
        if self.enable_guardrails {
            self.output_guardrail.sanitize(&content)
        } else {
            content
        }
    }
}

fn detect_tool_calls(completion: &Completion) -> Vec<ToolCall> {
    if !completion.tool_calls.is_empty() {
        completion.tool_calls.clone()
    } else {
        conduit_parser::extract_tool_calls(&completion.text)
    }
}

fn stringify_tool_result(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
