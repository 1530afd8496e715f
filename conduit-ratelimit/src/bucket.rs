//! The token-bucket implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use conduit_types::RateLimitError;

struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

/// A per-key token bucket rate limiter.
///
/// Each key gets its own bucket, created full on first use. Buckets refill
/// continuously: `Acquire` computes how many whole `refill_interval`s have
/// elapsed since the bucket's last refill, credits that many tokens (capped
/// at capacity), and advances `last_refill` by `refills * refill_interval`
/// rather than snapping it to `now` — snapping would silently discard
/// fractional credit for the interval in progress.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
    capacity: u32,
    refill_interval: Duration,
}

impl RateLimiter {
    /// Create a limiter with the given per-key capacity and refill interval
    /// (one token credited per interval).
    #[must_use]
    pub fn new(capacity: u32, refill_interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            buckets: Mutex::new(HashMap::new()),
            capacity,
            refill_interval,
        })
    }

    /// Attempt to acquire one token for `key`.
    ///
    /// On success, returns a [`Release`] the caller can use to credit the
    /// token back (e.g. if the work it gated turned out not to happen).
    /// Returns [`RateLimitError::Exhausted`] if the bucket has no tokens
    /// after refilling.
    pub fn acquire(self: &Arc<Self>, key: &str) -> Result<Release, RateLimitError> {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let bucket = buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: self.capacity,
            last_refill: now,
        });

        self.refill(bucket, now);

        if bucket.tokens == 0 {
            tracing::debug!(key, "conduit.ratelimit.exhausted");
            return Err(RateLimitError::Exhausted(key.to_string()));
        }
        bucket.tokens -= 1;

        Ok(Release {
            limiter: Arc::clone(self),
            key: key.to_string(),
        })
    }

    fn refill(&self, bucket: &mut Bucket, now: Instant) {
        if self.refill_interval.is_zero() {
            bucket.tokens = self.capacity;
            bucket.last_refill = now;
            return;
        }
        let elapsed = now.saturating_duration_since(bucket.last_refill);
        let refills = (elapsed.as_nanos() / self.refill_interval.as_nanos().max(1)) as u32;
        if refills > 0 {
            bucket.tokens = bucket.tokens.saturating_add(refills).min(self.capacity);
            bucket.last_refill += self.refill_interval * refills;
        }
    }

    fn release(&self, key: &str) {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bucket) = buckets.get_mut(key) {
            bucket.tokens = bucket.tokens.saturating_add(1).min(self.capacity);
        }
    }
}

/// A handle returned by a successful [`RateLimiter::acquire`].
///
/// Calling [`Release::release`] credits the token back to its bucket
/// (bounded by capacity). Dropping the handle without calling it leaves the
/// bucket as-is — the token stays spent until the next natural refill.
#[must_use = "dropping a Release without calling it spends the token permanently"]
pub struct Release {
    limiter: Arc<RateLimiter>,
    key: String,
}

impl Release {
    /// Credit the acquired token back to its bucket.
    pub fn release(self) {
        self.limiter.release(&self.key);
    }
}
