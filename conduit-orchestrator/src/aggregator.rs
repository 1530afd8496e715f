//! Merges a stream of [`CompletionChunk`]s into a cumulative [`Completion`],
//! surfacing tool calls as early as possible — including calls whose JSON
//! spans multiple chunks.

use conduit_types::{Completion, CompletionChunk, ToolCall, Usage};

/// Accumulates streamed chunks into a cumulative completion.
///
/// Two buffers are kept because the rendered `text` a caller sees may have
/// been normalized, while `partial_buffer` retains the raw concatenation a
/// structural JSON parse needs to stay valid across chunk boundaries.
#[derive(Debug, Default)]
pub struct StreamingAggregator {
    text_buffer: String,
    partial_buffer: String,
    tool_calls: Vec<ToolCall>,
    early_calls: Vec<ToolCall>,
    usage: Option<Usage>,
}

impl StreamingAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk into the aggregator's state.
    pub fn push(&mut self, chunk: &CompletionChunk) {
        self.text_buffer.push_str(&chunk.delta_text);
        self.partial_buffer.push_str(&chunk.delta_text);

        if !chunk.tool_calls.is_empty() {
            self.tool_calls.extend(chunk.tool_calls.iter().cloned());
            if self.early_calls.is_empty() {
                self.early_calls = chunk.tool_calls.clone();
            }
        } else {
            let parsed = conduit_parser::extract_tool_calls(&self.text_buffer);
            let parsed = if parsed.is_empty() {
                conduit_parser::extract_tool_calls(&self.partial_buffer)
            } else {
                parsed
            };
            if !parsed.is_empty() {
                self.tool_calls = parsed.clone();
                if self.early_calls.is_empty() {
                    self.early_calls = parsed;
                }
            }
        }

        if let Some(usage) = chunk.usage {
            self.usage = Some(usage);
        }
    }

    /// The tool calls detected as soon as any chunk surfaced them —
    /// may be a strict subset of [`StreamingAggregator::finalize`]'s list.
    #[must_use]
    pub fn early_tool_calls(&self) -> &[ToolCall] {
        &self.early_calls
    }

    /// The cumulative tool-call list as of the last processed chunk.
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCall] {
        &self.tool_calls
    }

    /// The cumulative text as of the last processed chunk.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text_buffer
    }

    /// One last parse across both buffers, to catch tool calls that only
    /// close on the terminal chunk, then return the finished completion.
    #[must_use]
    pub fn finalize(mut self) -> Completion {
        if self.tool_calls.is_empty() {
            let parsed = conduit_parser::extract_tool_calls(&self.text_buffer);
            let parsed = if parsed.is_empty() {
                conduit_parser::extract_tool_calls(&self.partial_buffer)
            } else {
                parsed
            };
            self.tool_calls = parsed;
        }
        Completion {
            text: self.text_buffer,
            tool_calls: self.tool_calls,
            usage: self.usage,
            done: true,
        }
    }
}
