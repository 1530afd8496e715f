#![deny(missing_docs)]
//! Core data model and capability traits shared by every conduit crate.
//!
//! One foundational crate holding the message/request/response shapes, the
//! error taxonomy for every concern, and the `Provider` trait, so that
//! downstream crates (`conduit-tool`, `conduit-orchestrator`, ...) depend on
//! a single stable vocabulary instead of redeclaring it.

mod error;
mod policy;
mod stream;
mod traits;
mod types;

pub use error::{
    CacheError, GuardrailError, HarnessError, ProviderError, RateLimitError, StoreError, ToolError,
};
pub use policy::Policy;
pub use stream::{StreamError, StreamEvent, StreamHandle};
pub use traits::Provider;
pub use types::{
    CacheEntry, Completion, CompletionChunk, Conversation, PromptInput, PromptMessage,
    ProviderOptions, RateLimitBucket, Request, Role, ToolCall, ToolChoice, ToolSpec, Turn, Usage,
    normalize_text,
};
