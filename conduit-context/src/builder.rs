//! Assembles a normalized [`PromptInput`] from a request's raw fields.

use conduit_types::{normalize_text, PromptInput, PromptMessage, ToolSpec};

/// Stateless assembler that normalizes whitespace in every text field and
/// preserves input order — nothing here re-sorts messages or context,
/// since order is semantically meaningful.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build a [`PromptInput`] from the given fields, normalizing the
    /// system text, each message's content, and each context snippet.
    #[must_use]
    pub fn build(
        system: Option<&str>,
        messages: &[PromptMessage],
        context: &[String],
        tools: Vec<ToolSpec>,
    ) -> PromptInput {
        PromptInput {
            system: system.map(normalize_text),
            messages: messages
                .iter()
                .map(|m| PromptMessage { role: m.role, content: normalize_text(&m.content) })
                .collect(),
            context: context.iter().map(|c| normalize_text(c)).collect(),
            tools,
            meta: Default::default(),
        }
    }
}
