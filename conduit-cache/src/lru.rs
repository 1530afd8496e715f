//! Arena-indexed intrusive doubly-linked-list LRU.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::trait_def::Cache;

struct Slot {
    key: String,
    value: Vec<u8>,
    expires_at: Instant,
    prev: Option<usize>,
    next: Option<usize>,
}

struct Inner {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
    /// Indices of removed slots available for reuse, so capacity-bounded
    /// churn doesn't grow the arena unboundedly.
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl Inner {
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[idx].prev = None;
        self.slots[idx].next = None;
    }

    fn push_front(&mut self, idx: usize) {
        self.slots[idx].prev = None;
        self.slots[idx].next = self.head;
        if let Some(h) = self.head {
            self.slots[h].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn touch(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn remove(&mut self, idx: usize) {
        self.unlink(idx);
        self.index.remove(&self.slots[idx].key);
        self.free.push(idx);
    }

    fn evict_tail(&mut self) {
        if let Some(idx) = self.tail {
            tracing::debug!(key = %self.slots[idx].key, "conduit.cache.evict");
            self.remove(idx);
        }
    }
}

/// An LRU cache with TTL, capacity-bounded and guarded by a single
/// read-write lock.
pub struct LruCache {
    inner: RwLock<Inner>,
}

impl LruCache {
    /// Create a cache with the given capacity. A capacity of zero rejects
    /// every `set`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                slots: Vec::new(),
                index: HashMap::new(),
                free: Vec::new(),
                head: None,
                tail: None,
                capacity,
            }),
        }
    }

    /// Current number of live (non-expired-on-insert) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().index.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for LruCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut inner = self.inner.write();
        let idx = *inner.index.get(key)?;
        if inner.slots[idx].expires_at <= Instant::now() {
            inner.remove(idx);
            return None;
        }
        inner.touch(idx);
        Some(inner.slots[idx].value.clone())
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        let mut inner = self.inner.write();
        let expires_at = Instant::now() + ttl;

        if let Some(&idx) = inner.index.get(key) {
            inner.slots[idx].value = value;
            inner.slots[idx].expires_at = expires_at;
            inner.touch(idx);
            return;
        }

        if inner.capacity == 0 {
            return;
        }

        if inner.index.len() >= inner.capacity {
            inner.evict_tail();
        }

        let slot = Slot { key: key.to_string(), value, expires_at, prev: None, next: None };
        let idx = if let Some(reused) = inner.free.pop() {
            inner.slots[reused] = slot;
            reused
        } else {
            inner.slots.push(slot);
            inner.slots.len() - 1
        };
        inner.index.insert(key.to_string(), idx);
        inner.push_front(idx);
    }

    fn delete(&self, key: &str) {
        let mut inner = self.inner.write();
        if let Some(&idx) = inner.index.get(key) {
            inner.remove(idx);
        }
    }
}
