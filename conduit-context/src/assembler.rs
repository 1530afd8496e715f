//! Greedy knapsack packing of ranked context snippets under a token budget.

use crate::token_estimator::{HeuristicEstimator, TokenEstimator};

/// A candidate context snippet with a relevance score and, optionally, a
/// precomputed token count (skipping the heuristic estimate when the
/// caller already knows it, e.g. from an embedding index).
#[derive(Debug, Clone)]
pub struct ScoredSnippet {
    /// The snippet text.
    pub text: String,
    /// Relevance score; higher is packed first.
    pub score: f64,
    /// Precomputed token count, if known.
    pub tokens: Option<usize>,
}

/// Packs snippets under `{max_context_tokens, max_snippets}` using a greedy
/// knapsack: snippets are tried in descending score order, and any snippet
/// that would exceed the remaining token budget is skipped (not a hard
/// stop) so a later, smaller snippet still gets a chance to fit.
pub struct ContextAssembler<E: TokenEstimator = HeuristicEstimator> {
    max_context_tokens: usize,
    max_snippets: usize,
    estimator: E,
}

impl ContextAssembler<HeuristicEstimator> {
    /// Build an assembler with the default heuristic token estimator.
    #[must_use]
    pub fn new(max_context_tokens: usize, max_snippets: usize) -> Self {
        Self { max_context_tokens, max_snippets, estimator: HeuristicEstimator }
    }
}

impl<E: TokenEstimator> ContextAssembler<E> {
    /// Build an assembler with a custom token estimator.
    #[must_use]
    pub fn with_estimator(max_context_tokens: usize, max_snippets: usize, estimator: E) -> Self {
        Self { max_context_tokens, max_snippets, estimator }
    }

    /// Pack `snippets` under the configured budget, returning the selected
    /// texts in the order they were accepted (descending score).
    #[must_use]
    pub fn assemble(&self, mut snippets: Vec<ScoredSnippet>) -> Vec<String> {
        snippets.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut selected = Vec::new();
        let mut remaining_tokens = self.max_context_tokens;
        let mut remaining_slots = self.max_snippets;

        for snippet in snippets {
            if remaining_slots == 0 {
                break;
            }
            let tokens = snippet.tokens.unwrap_or_else(|| self.estimator.estimate(&snippet.text));
            if tokens > remaining_tokens {
                continue;
            }
            remaining_tokens -= tokens;
            remaining_slots -= 1;
            selected.push(snippet.text);
        }

        selected
    }
}
