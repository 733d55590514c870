//! Capacity-bounded LRU cache with per-entry TTL.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use brief_core::Clock;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

struct CacheInner<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    /// Least recently used first.
    order: Vec<K>,
    max_size: usize,
    ttl: Duration,
}

/// Thread-safe LRU cache; entries expire `ttl` after insertion.
pub struct TtlCache<K, V> {
    inner: Mutex<CacheInner<K, V>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(max_size: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
                ttl,
            }),
            clock,
        }
    }

    /// Cached value, or `None` on a miss or an expired entry.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut inner = self.inner.lock();

        let expired = inner
            .entries
            .get(key)
            .map(|e| now - e.inserted_at >= inner.ttl);

        match expired {
            Some(false) => {
                let value = inner.entries.get(key).map(|e| e.value.clone());
                if let Some(pos) = inner.order.iter().position(|k| k == key) {
                    let k = inner.order.remove(pos);
                    inner.order.push(k);
                }
                value
            }
            Some(true) => {
                inner.entries.remove(key);
                inner.order.retain(|k| k != key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        if inner.max_size == 0 {
            return;
        }

        if inner.entries.contains_key(&key) {
            inner.entries.insert(
                key.clone(),
                CacheEntry {
                    value,
                    inserted_at: now,
                },
            );
            inner.order.retain(|k| k != &key);
            inner.order.push(key);
            return;
        }

        while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
            let oldest = inner.order.remove(0);
            inner.entries.remove(&oldest);
        }

        inner.order.push(key.clone());
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        let ttl = inner.ttl;

        let before = inner.entries.len();
        inner.entries.retain(|_, e| now - e.inserted_at < ttl);
        let CacheInner { entries, order, .. } = &mut *inner;
        order.retain(|k| entries.contains_key(k));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
