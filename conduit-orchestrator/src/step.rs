//! Turn-by-turn driving of the tool-calling loop, for callers that want to
//! inspect or inject messages between iterations (interactive CLIs, tests).
//!
//! Additive relative to the blocking [`crate::Orchestrator::orchestrate`] and
//! [`crate::Orchestrator::orchestrate_stream`] entry points, which remain the
//! primary surface: the iterator borrows the orchestrator and the request
//! for its lifetime and drives exactly one provider round-trip (plus, if the
//! model asked for tools, one tool-execution round) per call to
//! [`StepIterator::next`].

use conduit_context::PromptBuilder;
use conduit_guardrails::GuardrailResult;
use conduit_tool::{ToolContext, ToolRegistry};
use conduit_types::{
    HarnessError, PromptInput, PromptMessage, ProviderOptions, Request, Role, ToolCall, ToolChoice,
};
use conduit_types::Provider;

use crate::orchestrator::Orchestrator;
use crate::response::OrchestratorResponse;
use crate::tool_exec::{execute_tools, ToolBatchResult};

/// The outcome of a single turn driven by [`StepIterator::next`].
#[derive(Debug)]
pub enum TurnResult {
    /// The model asked for tools; they were executed and the results were
    /// folded back into the conversation.
    ToolsExecuted {
        /// The tool calls the model made this turn.
        calls: Vec<ToolCall>,
        /// Per-call outcomes, in call order.
        batch: ToolBatchResult,
    },
    /// The model returned a final response with no further tool calls.
    FinalResponse(OrchestratorResponse),
    /// `policy.max_iterations` was reached before a final response.
    MaxIterationsReached,
    /// `policy.max_tool_depth` was reached before a final response.
    MaxDepthReached,
    /// The turn failed (provider error, guardrail tripwire, cancellation).
    Error(HarnessError),
}

/// Drives [`Orchestrator`]'s loop one turn at a time.
///
/// Created via [`Orchestrator::run_step`]. Does not consult the cache or the
/// rate limiter — those gate the orchestration as a whole, not a single
/// turn — but still applies guardrails and policy limits per turn, and still
/// records the final response into the cache and the conversation store once
/// a [`TurnResult::FinalResponse`] is produced.
pub struct StepIterator<'a, P: Provider> {
    orchestrator: &'a Orchestrator<P>,
    req: &'a mut Request,
    tools: &'a ToolRegistry,
    prompt_input: PromptInput,
    iteration: usize,
    depth: usize,
    finished: bool,
}

impl<'a, P: Provider> StepIterator<'a, P> {
    pub(crate) fn new(orchestrator: &'a Orchestrator<P>, req: &'a mut Request, tools: &'a ToolRegistry) -> Self {
        let prompt_input = PromptBuilder::build(
            req.system.as_deref(),
            &req.conversation.messages,
            &req.context,
            tools.definitions(),
        );
        Self {
            orchestrator,
            req,
            tools,
            prompt_input,
            iteration: 0,
            depth: 0,
            finished: false,
        }
    }

    /// Advance the loop by one turn.
    ///
    /// Returns `None` once the loop has already finished (a final response,
    /// a limit, or an error was already returned by a previous call).
    pub async fn next(&mut self) -> Option<TurnResult> {
        if self.finished {
            return None;
        }

        if self.req.cancellation_token.is_cancelled() {
            self.finished = true;
            return Some(TurnResult::Error(HarnessError::CancelledOrTimedOut));
        }

        if let Err(e) = self.orchestrator.policy_validator().validate_iteration(self.iteration, &self.req.policy) {
            self.finished = true;
            return Some(match e {
                HarnessError::MaxIterationsExceeded(_) => TurnResult::MaxIterationsReached,
                other => TurnResult::Error(other),
            });
        }

        let options = ProviderOptions {
            tool_choice: ToolChoice::Auto,
            seed: if self.req.policy.deterministic && self.iteration == 0 { Some(42) } else { None },
            ..ProviderOptions::default()
        };

        let completion = match self.orchestrator.provider().complete(self.prompt_input.clone(), options).await {
            Ok(c) => c,
            Err(e) => {
                self.finished = true;
                return Some(TurnResult::Error(HarnessError::Provider(e)));
            }
        };
        self.iteration += 1;

        let tool_calls = if !completion.tool_calls.is_empty() {
            completion.tool_calls.clone()
        } else {
            conduit_parser::extract_tool_calls(&completion.text)
        };

        if tool_calls.is_empty() {
            self.finished = true;
            if self.orchestrator.guardrails_enabled() {
                if let GuardrailResult::Tripwire(reason) = self.orchestrator.output_guardrail().validate(&completion.text) {
                    return Some(TurnResult::Error(HarnessError::GuardrailViolation(reason)));
                }
                if let Err(e) = self.orchestrator.policy_validator().validate_output_size(completion.text.len()) {
                    return Some(TurnResult::Error(e));
                }
            }
            return Some(TurnResult::FinalResponse(OrchestratorResponse {
                text: completion.text,
                usage: completion.usage,
            }));
        }

        if let Err(e) = self.orchestrator.policy_validator().validate_depth(self.depth, &self.req.policy) {
            self.finished = true;
            return Some(match e {
                HarnessError::MaxDepthExceeded(_) => TurnResult::MaxDepthReached,
                other => TurnResult::Error(other),
            });
        }

        if self.orchestrator.guardrails_enabled() {
            for call in &tool_calls {
                if let GuardrailResult::Tripwire(reason) = self.orchestrator.tool_call_validator().check(call) {
                    self.finished = true;
                    return Some(TurnResult::Error(HarnessError::GuardrailViolation(reason)));
                }
            }
        }

        let tool_ctx = ToolContext {
            session_id: self.req.conversation.id.clone(),
            cancellation_token: self.req.cancellation_token.child_token(),
        };
        let batch = execute_tools(
            self.tools,
            &tool_calls,
            self.orchestrator.tool_concurrency(),
            self.req.policy.tool_timeout,
            &tool_ctx,
        )
        .await;

        self.req.conversation.messages.push(PromptMessage::new(Role::Assistant, completion.text.clone()));
        for (_, value) in batch.successes() {
            let content = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            self.req.conversation.messages.push(PromptMessage::new(Role::Tool, content));
        }

        self.depth += 1;
        self.prompt_input = PromptBuilder::build(
            self.req.system.as_deref(),
            &self.req.conversation.messages,
            &self.req.context,
            self.tools.definitions(),
        );

        Some(TurnResult::ToolsExecuted { calls: tool_calls, batch })
    }
}
