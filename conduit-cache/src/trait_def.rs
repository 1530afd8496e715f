//! The `Cache` capability contract.

use std::time::Duration;

/// A capacity-bounded key-value cache with per-entry TTL.
///
/// Synchronous by design: the default in-memory implementation never
/// blocks, so there is no reason to force every caller through an async
/// boundary for it (see the concurrency model's note that cache I/O is
/// "non-blocking" for the default backend).
pub trait Cache: Send + Sync {
    /// Look up `key`. Returns `None` if absent or expired — an expired
    /// entry is evicted in place as a side effect of the lookup.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Insert or update `key`. Promotes to most-recently-used; evicts the
    /// least-recently-used entry if this insert would exceed capacity.
    fn set(&self, key: &str, value: Vec<u8>, ttl: Duration);

    /// Remove `key`, if present.
    fn delete(&self, key: &str);
}
