#![deny(missing_docs)]
//! Conversation-turn persistence.
//!
//! One trait, two backends: [`MemoryStore`] for tests and single-process
//! use, [`FsStore`] for append-only on-disk persistence — the same split
//! the rest of this harness's adapters follow (an in-memory reference
//! implementation alongside a production-shaped one).

mod erased;
mod fs;
mod memory;
mod trait_def;

pub use erased::ErasedConversationStore;
pub use fs::FsStore;
pub use memory::MemoryStore;
pub use trait_def::ConversationStore;
