#![deny(missing_docs)]
//! Prompt assembly: normalizing the raw request fields into a
//! [`conduit_types::PromptInput`], and packing ranked context snippets
//! under a token/count budget before they get there.

mod assembler;
mod builder;
mod token_estimator;

pub use assembler::{ContextAssembler, ScoredSnippet};
pub use builder::PromptBuilder;
pub use token_estimator::{HeuristicEstimator, TokenEstimator};
