//! Workspace-level smoke test: wires a full [`conduit_factory::OrchestratorBuilder`]
//! around a canned provider and a reference tool, with no live model backend
//! or network access required.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use conduit_factory::{HarnessConfig, OrchestratorBuilder};
use conduit_tool::{ToolContext, ToolDyn, ToolRegistry};
use conduit_types::{
    Completion, Conversation, Policy, PromptInput, PromptMessage, ProviderError, ProviderOptions,
    Request, Role, StreamHandle, ToolCall, Usage,
};

/// Returns pre-scripted completions in order, counting how many times it
/// was called.
struct ScriptedProvider {
    responses: Mutex<Vec<Completion>>,
    calls: Arc<AtomicUsize>,
}

impl conduit_types::Provider for ScriptedProvider {
    async fn complete(&self, _input: PromptInput, _options: ProviderOptions) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.responses.lock().unwrap().remove(0))
    }

    async fn complete_stream(&self, _input: PromptInput, _options: ProviderOptions) -> Result<StreamHandle, ProviderError> {
        Err(ProviderError::InvalidRequest("smoke test provider has no streaming support".to_string()))
    }
}

struct EchoTool;

impl ToolDyn for EchoTool {
    fn name(&self) -> &str {
        "kg_search"
    }

    fn description(&self) -> &str {
        "echoes its arguments back as the search result"
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }

    fn invoke(
        &self,
        args: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, conduit_types::ToolError>> + Send + '_>> {
        Box::pin(async move { Ok(args) })
    }
}

#[tokio::test]
async fn full_wiring_drives_a_tool_calling_conversation_to_completion() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = ScriptedProvider {
        responses: Mutex::new(vec![
            Completion {
                text: String::new(),
                tool_calls: vec![ToolCall {
                    name: "kg_search".to_string(),
                    args: serde_json::json!({"query": "composability patterns"}),
                }],
                usage: None,
                done: true,
            },
            Completion {
                text: "Found results for composability patterns.".to_string(),
                tool_calls: Vec::new(),
                usage: Some(Usage { prompt_tokens: 20, completion_tokens: 8, total_tokens: 28 }),
                done: true,
            },
        ]),
        calls: Arc::clone(&calls),
    };

    let orchestrator = OrchestratorBuilder::new(provider)
        .config(HarnessConfig::default())
        .cache(false, 0)
        .build();

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(EchoTool));

    let mut req = Request::new(
        Conversation {
            id: "smoke-1".to_string(),
            messages: vec![PromptMessage::new(Role::User, "search for composability patterns")],
        },
        Some("You are a concise assistant.".to_string()),
        Vec::new(),
        Vec::new(),
        Policy::default(),
    );

    let response = orchestrator.orchestrate(&mut req, &tools).await.unwrap();

    assert_eq!(response.text, "Found results for composability patterns.");
    assert_eq!(response.usage.unwrap().total_tokens, 28);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    // One assistant turn and one synthesized tool-result turn were appended
    // to the conversation in place.
    assert_eq!(req.conversation.messages.len(), 3);
    assert_eq!(req.conversation.messages[2].role, Role::Tool);
}

#[tokio::test]
async fn rate_limit_and_guardrails_compose_through_the_builder() {
    let provider = ScriptedProvider {
        responses: Mutex::new(vec![Completion {
            text: String::new(),
            tool_calls: vec![ToolCall { name: "shell_exec".to_string(), args: serde_json::json!({}) }],
            usage: None,
            done: true,
        }]),
        calls: Arc::new(AtomicUsize::new(0)),
    };

    let orchestrator = OrchestratorBuilder::new(provider)
        .cache(false, 0)
        .allowed_tools(vec!["kg_search".to_string()])
        .build();

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(EchoTool));

    let mut req = Request::new(
        Conversation { id: "smoke-2".to_string(), messages: vec![PromptMessage::new(Role::User, "rm -rf /")] },
        None,
        Vec::new(),
        Vec::new(),
        Policy::default(),
    );

    let err = orchestrator.orchestrate(&mut req, &tools).await.unwrap_err();
    assert!(matches!(err, conduit_types::HarnessError::GuardrailViolation(_)));
}
