//! Core message, request, and response shapes.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A system instruction.
    System,
    /// A developer instruction (distinct from end-user input).
    Developer,
    /// A human user.
    User,
    /// An AI assistant.
    Assistant,
    /// A synthesized tool-result message.
    Tool,
}

/// A single message in a prompt or conversation.
///
/// Content is a single normalized text string — this harness does not model
/// multimodal content blocks, only the text the orchestrator loop itself
/// reasons about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Who is speaking.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl PromptMessage {
    /// Construct a message, normalizing its content (see [`normalize_text`]).
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: normalize_text(&content.into()),
        }
    }
}

/// Normalize whitespace: CRLF/CR to LF, then trim leading/trailing whitespace.
///
/// Shared by the prompt builder and the context assembler so every text field
/// entering a [`PromptInput`] is normalized the same way.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// A tool definition surfaced to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique, non-empty tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema (Draft 2020-12 recommended) for the tool's arguments.
    pub json_schema: serde_json::Value,
}

/// A model-produced (or text-parsed) intent to invoke a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// The tool name.
    pub name: String,
    /// Raw JSON arguments.
    pub args: serde_json::Value,
}

/// Assembled, normalized input to a provider call. Built fresh every
/// iteration and never mutated after construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptInput {
    /// Normalized system text, if any.
    pub system: Option<String>,
    /// Conversation history, in order.
    pub messages: Vec<PromptMessage>,
    /// Retrieved context snippets, already packed under budget.
    pub context: Vec<String>,
    /// Tool specs available this iteration.
    pub tools: Vec<ToolSpec>,
    /// Free-form metadata forwarded to the provider.
    pub meta: HashMap<String, String>,
}

/// Tool selection strategy requested of the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum ToolChoice {
    /// Model decides whether to use tools.
    #[default]
    Auto,
    /// Model must not use tools.
    None,
    /// Model must use the named tool.
    Specific(String),
}

/// Per-call generation options passed to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOptions {
    /// Maximum tokens to generate.
    pub max_new_tokens: usize,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling parameter.
    pub top_p: f32,
    /// Minimum-probability sampling parameter.
    pub min_p: Option<f32>,
    /// Deterministic seed; set only for iteration 1 under a deterministic policy.
    pub seed: Option<u64>,
    /// Stop sequences.
    pub stop: Vec<String>,
    /// Tool selection strategy.
    pub tool_choice: ToolChoice,
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            max_new_tokens: 1024,
            temperature: 0.7,
            top_p: 0.9,
            min_p: None,
            seed: None,
            stop: Vec::new(),
            tool_choice: ToolChoice::Auto,
            timeout_ms: 30_000,
        }
    }
}

/// Token usage reported by the provider. `total` is authoritative on the
/// final chunk of a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: usize,
    /// Tokens consumed by the completion.
    pub completion_tokens: usize,
    /// `prompt_tokens + completion_tokens`.
    pub total_tokens: usize,
}

/// A full (non-streaming) completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Completion {
    /// The text delta/content (for a full completion, the entire text).
    pub text: String,
    /// Tool calls the model made explicitly.
    pub tool_calls: Vec<ToolCall>,
    /// Usage, when reported.
    pub usage: Option<Usage>,
    /// Whether generation is complete.
    pub done: bool,
}

/// One chunk of a streaming completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionChunk {
    /// Incremental text since the last chunk.
    pub delta_text: String,
    /// Tool calls surfaced in this chunk, if the provider emits structured calls.
    pub tool_calls: Vec<ToolCall>,
    /// Usage, when reported (only authoritative on the final chunk).
    pub usage: Option<Usage>,
    /// Whether this is the terminal chunk.
    pub done: bool,
}

/// A conversation: an id and its message history, mutated in place within a
/// single orchestration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Stable conversation identifier.
    pub id: String,
    /// Messages so far, oldest first.
    pub messages: Vec<PromptMessage>,
}

/// A persisted turn (the conversation-store shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn.
    pub role: Role,
    /// Turn content.
    pub content: String,
    /// When the turn was recorded.
    pub created_at: DateTime<Utc>,
}

/// A single orchestration request. Owned by the caller; the core reads it
/// and mutates only `conversation.messages`.
#[derive(Debug, Clone)]
pub struct Request {
    /// The conversation being advanced.
    pub conversation: Conversation,
    /// System prompt text.
    pub system: Option<String>,
    /// Retrieved context snippets.
    pub context: Vec<String>,
    /// Tools available for this request.
    pub tools: Vec<ToolSpec>,
    /// Policy governing depth, iteration, and timeout limits.
    pub policy: Policy,
    /// Cancels the orchestration (and every provider call, tool call, and
    /// rate-limit wait it spawns) cooperatively when triggered.
    pub cancellation_token: tokio_util::sync::CancellationToken,
}

impl Request {
    /// Construct a request with a fresh cancellation token and the given
    /// policy.
    #[must_use]
    pub fn new(
        conversation: Conversation,
        system: Option<String>,
        context: Vec<String>,
        tools: Vec<ToolSpec>,
        policy: Policy,
    ) -> Self {
        Self {
            conversation,
            system,
            context,
            tools,
            policy,
            cancellation_token: tokio_util::sync::CancellationToken::new(),
        }
    }
}

use crate::policy::Policy;

/// An entry in the LRU cache.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cache key.
    pub key: String,
    /// The cached bytes (a serialized [`Completion`]).
    pub value: Vec<u8>,
    /// Absolute expiry time.
    pub expires_at: std::time::Instant,
}

/// Per-key token-bucket state.
#[derive(Debug, Clone)]
pub struct RateLimitBucket {
    /// The bucket's key.
    pub key: String,
    /// Tokens currently available, in `[0, capacity]`.
    pub tokens: u32,
    /// Last time the bucket was refilled.
    pub last_refill: std::time::Instant,
}

/// A constant used by the rate limiter's discretized refill (documented here
/// since [`RateLimitBucket`] is a shared data-model type).
pub const DEFAULT_REFILL_INTERVAL: Duration = Duration::from_secs(1);
