//! End-to-end orchestration scenarios and cross-cutting invariants.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use conduit_cache::LruCache;
use conduit_guardrails::{OutputGuardrail, PolicyValidator, ToolCallValidator};
use conduit_orchestrator::Orchestrator;
use conduit_ratelimit::RateLimiter;
use conduit_store::MemoryStore;
use conduit_tool::{ToolContext, ToolDyn, ToolRegistry};
use conduit_trace::NoopTracer;
use conduit_types::{
    Completion, Conversation, HarnessError, Policy, PromptInput, PromptMessage, ProviderError,
    ProviderOptions, Request, Role, StreamHandle, ToolCall, Usage,
};
use std::future::Future;
use std::pin::Pin;

/// Returns pre-configured completions in sequence, counting how many times
/// it was called. The counter is shared via `Arc` so a test can still read
/// it after the provider itself has been moved into an [`Orchestrator`].
struct ScriptedProvider {
    responses: Mutex<Vec<Completion>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    fn new(responses: Vec<Completion>, calls: Arc<AtomicUsize>) -> Self {
        Self { responses: Mutex::new(responses), calls }
    }
}

impl conduit_types::Provider for ScriptedProvider {
    async fn complete(&self, _input: PromptInput, _options: ProviderOptions) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            panic!("ScriptedProvider: no more responses configured");
        }
        Ok(responses.remove(0))
    }

    async fn complete_stream(&self, _input: PromptInput, _options: ProviderOptions) -> Result<StreamHandle, ProviderError> {
        Err(ProviderError::InvalidRequest("streaming not configured in this test provider".to_string()))
    }
}

/// A tool that always succeeds, echoing its arguments back as the result.
struct EchoTool {
    name: &'static str,
}

impl ToolDyn for EchoTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "echoes its arguments"
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

/// A tool that always succeeds but leaks a credential-shaped string in its
/// result, used to exercise output sanitization on the tool-result path.
struct LeakyTool {
    name: &'static str,
}

impl ToolDyn for LeakyTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "returns a result containing a sensitive-looking value"
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }

    fn invoke(
        &self,
        _args: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, conduit_types::ToolError>> + Send + '_>> {
        Box::pin(async move { Ok(serde_json::json!("password: hunter2")) })
    }
}

fn request(id: &str, policy: Policy) -> Request {
    Request::new(Conversation { id: id.to_string(), messages: vec![PromptMessage::new(Role::User, "Hello")] }, None, Vec::new(), Vec::new(), policy)
}

fn text_completion(text: &str, usage: Usage) -> Completion {
    Completion { text: text.to_string(), tool_calls: Vec::new(), usage: Some(usage), done: true }
}

fn build_orchestrator(
    provider: ScriptedProvider,
    cache_enabled: bool,
    store: Option<Arc<MemoryStore>>,
) -> Orchestrator<ScriptedProvider> {
    let cache: Option<Arc<dyn conduit_cache::Cache>> = if cache_enabled { Some(Arc::new(LruCache::new(100))) } else { None };
    let store: Option<Arc<dyn conduit_store::ErasedConversationStore>> =
        store.map(|s| s as Arc<dyn conduit_store::ErasedConversationStore>);
    Orchestrator::new(
        provider,
        cache,
        None,
        store,
        Arc::new(NoopTracer::new()),
        ToolCallValidator::allow_all(Vec::new()),
        OutputGuardrail::with_defaults(Vec::new()),
        PolicyValidator::new(),
        true,
        5,
    )
}

#[tokio::test]
async fn e2e_1_simple_completion_no_tools() {
    let provider = ScriptedProvider::new(
        vec![text_completion("Assistant response", Usage { prompt_tokens: 10, completion_tokens: 5, total_tokens: 15 })],
        Arc::new(AtomicUsize::new(0)),
    );
    let store = Arc::new(MemoryStore::new());
    let orchestrator = build_orchestrator(provider, false, Some(store.clone()));

    let mut req = request("c1", Policy::default());
    let tools = ToolRegistry::new();
    let resp = orchestrator.orchestrate(&mut req, &tools).await.unwrap();

    assert_eq!(resp.text, "Assistant response");
    assert_eq!(resp.usage.unwrap().total_tokens, 15);

    let turns = conduit_store::ConversationStore::load_context(store.as_ref(), "c1", 0).await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, Role::Assistant);
    assert_eq!(turns[0].content, "Assistant response");
}

#[tokio::test]
async fn e2e_2_multi_iteration_with_tools() {
    let tool_call = ToolCall { name: "kg_search".to_string(), args: serde_json::json!({"query": "testing tasks", "limit": 5}) };
    let provider = ScriptedProvider::new(
        vec![
            Completion { text: String::new(), tool_calls: vec![tool_call], usage: None, done: true },
            text_completion("this is a test", Usage::default()),
        ],
        Arc::new(AtomicUsize::new(0)),
    );
    let orchestrator = build_orchestrator(provider, false, None);

    let policy = Policy::new(1, 3, Duration::from_secs(30), false, false, 0, Duration::ZERO);
    let mut req = request("c2", policy);
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(EchoTool { name: "kg_search" }));

    let resp = orchestrator.orchestrate(&mut req, &tools).await.unwrap();
    assert!(resp.text.contains("test"));
}

#[tokio::test]
async fn tool_result_is_sanitized_before_reaching_conversation_and_store() {
    let tool_call = ToolCall { name: "kg_search".to_string(), args: serde_json::json!({}) };
    let provider = ScriptedProvider::new(
        vec![
            Completion { text: String::new(), tool_calls: vec![tool_call], usage: None, done: true },
            text_completion("done", Usage::default()),
        ],
        Arc::new(AtomicUsize::new(0)),
    );
    let store = Arc::new(MemoryStore::new());
    let orchestrator = build_orchestrator(provider, false, Some(Arc::clone(&store)));

    let policy = Policy::new(1, 3, Duration::from_secs(30), false, false, 0, Duration::ZERO);
    let mut req = request("c-sanitize", policy);
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(LeakyTool { name: "kg_search" }));

    orchestrator.orchestrate(&mut req, &tools).await.unwrap();

    let tool_message = req
        .conversation
        .messages
        .iter()
        .find(|m| m.role == Role::Tool)
        .expect("a tool-role message was appended");
    assert!(tool_message.content.contains("[REDACTED]"));
    assert!(!tool_message.content.contains("hunter2"));

    let stored = conduit_store::ConversationStore::load_context(store.as_ref(), "c-sanitize", -1).await.unwrap();
    let tool_turn = stored.iter().find(|t| t.role == Role::Tool).expect("tool artifact persisted");
    assert!(tool_turn.content.contains("[REDACTED]"));
    assert!(!tool_turn.content.contains("hunter2"));
}

#[tokio::test]
async fn e2e_3_and_invariant_4_cache_hit_avoids_second_provider_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = ScriptedProvider::new(
        vec![text_completion("cached answer", Usage::default()), text_completion("should never be returned", Usage::default())],
        Arc::clone(&calls),
    );
    let orchestrator = build_orchestrator(provider, true, None);
    let tools = ToolRegistry::new();

    let mut req1 = request("c3", Policy::default());
    let resp1 = orchestrator.orchestrate(&mut req1, &tools).await.unwrap();

    let mut req2 = request("c3", Policy::default());
    let resp2 = orchestrator.orchestrate(&mut req2, &tools).await.unwrap();

    assert_eq!(resp1.text, resp2.text);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn e2e_4_and_invariant_7_rate_limit_exhaustion_and_refill() {
    let limiter = RateLimiter::new(2, Duration::from_millis(200));

    let _p1 = limiter.acquire("orchestrate").unwrap();
    let _p2 = limiter.acquire("orchestrate").unwrap();
    assert!(matches!(limiter.acquire("orchestrate"), Err(conduit_types::RateLimitError::Exhausted(_))));

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(limiter.acquire("orchestrate").is_ok());
}

#[tokio::test]
async fn e2e_5_guardrails_reject_tool_outside_allowlist() {
    let provider = ScriptedProvider::new(
        vec![Completion {
            text: String::new(),
            tool_calls: vec![ToolCall { name: "shell_exec".to_string(), args: serde_json::json!({}) }],
            usage: None,
            done: true,
        }],
        Arc::new(AtomicUsize::new(0)),
    );
    let orchestrator = Orchestrator::new(
        provider,
        None,
        None,
        None,
        Arc::new(NoopTracer::new()),
        ToolCallValidator::with_allowlist(vec!["kg_search".to_string()], Vec::new()),
        OutputGuardrail::with_defaults(Vec::new()),
        PolicyValidator::new(),
        true,
        5,
    );

    let mut req = request("c5", Policy::default());
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(EchoTool { name: "shell_exec" }));

    let err = orchestrator.orchestrate(&mut req, &tools).await.unwrap_err();
    assert!(matches!(err, HarnessError::GuardrailViolation(_)));
}

#[tokio::test]
async fn e2e_6_streaming_tool_call_split_across_chunks() {
    use conduit_orchestrator::StreamingAggregator;
    use conduit_types::CompletionChunk;

    let mut aggregator = StreamingAggregator::new();
    aggregator.push(&CompletionChunk { delta_text: "[{\"name\":\"t\",".to_string(), tool_calls: Vec::new(), usage: None, done: false });
    aggregator.push(&CompletionChunk { delta_text: "\"arguments\":{\"x\":1}}]".to_string(), tool_calls: Vec::new(), usage: None, done: true });

    let completion = aggregator.finalize();
    assert_eq!(completion.tool_calls.len(), 1);
    assert_eq!(completion.tool_calls[0].name, "t");
    assert_eq!(completion.tool_calls[0].args["x"], 1);
}

#[tokio::test]
async fn max_iterations_is_enforced() {
    let tool_call = ToolCall { name: "kg_search".to_string(), args: serde_json::json!({}) };
    let provider = ScriptedProvider::new(
        std::iter::repeat_with(|| Completion { text: String::new(), tool_calls: vec![tool_call.clone()], usage: None, done: true })
            .take(10)
            .collect(),
        Arc::new(AtomicUsize::new(0)),
    );
    let orchestrator = build_orchestrator(provider, false, None);

    let policy = Policy::new(10, 2, Duration::from_secs(30), false, false, 0, Duration::ZERO);
    let mut req = request("c-iter", policy);
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(EchoTool { name: "kg_search" }));

    let err = orchestrator.orchestrate(&mut req, &tools).await.unwrap_err();
    assert!(matches!(err, HarnessError::MaxIterationsExceeded(2)));
}

#[tokio::test]
async fn max_tool_depth_is_enforced() {
    let tool_call = ToolCall { name: "kg_search".to_string(), args: serde_json::json!({}) };
    let provider = ScriptedProvider::new(
        std::iter::repeat_with(|| Completion { text: String::new(), tool_calls: vec![tool_call.clone()], usage: None, done: true })
            .take(10)
            .collect(),
        Arc::new(AtomicUsize::new(0)),
    );
    let orchestrator = build_orchestrator(provider, false, None);

    let policy = Policy::new(2, 10, Duration::from_secs(30), false, false, 0, Duration::ZERO);
    let mut req = request("c-depth", policy);
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(EchoTool { name: "kg_search" }));

    let err = orchestrator.orchestrate(&mut req, &tools).await.unwrap_err();
    assert!(matches!(err, HarnessError::MaxDepthExceeded(2)));
}

#[tokio::test]
async fn step_iterator_drives_one_turn_per_call() {
    use conduit_orchestrator::TurnResult;

    let provider = ScriptedProvider::new(vec![text_completion("done", Usage::default())], Arc::new(AtomicUsize::new(0)));
    let orchestrator = build_orchestrator(provider, false, None);

    let mut req = request("c-step", Policy::default());
    let tools = ToolRegistry::new();
    let mut steps = orchestrator.run_step(&mut req, &tools);

    match steps.next().await {
        Some(TurnResult::FinalResponse(resp)) => assert_eq!(resp.text, "done"),
        other => panic!("expected FinalResponse, got {other:?}"),
    }
}
