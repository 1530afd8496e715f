#![deny(missing_docs)]
//! An in-memory LRU cache with per-entry TTL.
//!
//! Backed by an intrusive doubly-linked list over an arena (`Vec<Slot>`)
//! plus a `HashMap` index, guarded by a single read-write lock — the same
//! shape as a textbook intrusive LRU, rendered without `unsafe` by using
//! arena indices instead of raw pointers for the prev/next links.

mod lru;
mod trait_def;

pub use lru::LruCache;
pub use trait_def::Cache;
