//! Deterministic cache-key construction.
//!
//! The key deliberately omits message history: two requests with the same
//! id, system text, context, tool count, and policy hit the same cache
//! entry even if their message histories differ. Callers relying on exact
//! history must fold it into the system field or disable caching.

use conduit_types::Request;

/// 32-bit djb2, rendered as lowercase hex.
fn djb2_hex(s: &str) -> String {
    let mut hash: u32 = 5381;
    for b in s.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(u32::from(b));
    }
    format!("{hash:08x}")
}

/// Compute the cache key for a request, in the fixed format
/// `conv:<id>|sys:<hash>|ctx:<hash>|tools:<len>|policy:<depth>:<iterations>`.
#[must_use]
pub fn compute_cache_key(req: &Request) -> String {
    let sys_hash = djb2_hex(req.system.as_deref().unwrap_or(""));
    let ctx_joined = req.context.join("|");
    let ctx_hash = djb2_hex(&ctx_joined);
    format!(
        "conv:{}|sys:{}|ctx:{}|tools:{}|policy:{}:{}",
        req.conversation.id,
        sys_hash,
        ctx_hash,
        req.tools.len(),
        req.policy.max_tool_depth,
        req.policy.max_iterations,
    )
}
