// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! In-process response cache for hot read endpoints.
//!
//! Capacity-bounded LRU with a per-entry TTL. Expired entries are evicted on
//! read. Keys are namespaced (`properties:{id}:full`,
//! `properties:owner:{wallet}`) so write paths can drop every related entry
//! with a single prefix invalidation. The cache is owned by `AppState` and
//! injected into handlers; there is no global mutable module state.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;

/// Cached entry: response body + insertion timestamp.
struct CacheEntry {
    value: Value,
    inserted_at: Instant,
}

/// TTL'd LRU cache of response bodies.
pub struct ResponseCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap()),
            )),
            ttl,
        }
    }

    /// Get a cached value. Returns `None` if absent or expired; an expired
    /// entry is removed on the spot.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.value.clone());
            }
            cache.pop(key);
        }
        None
    }

    /// Store a value under a key.
    pub fn put(&self, key: impl Into<String>, value: Value) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                key.into(),
                CacheEntry {
                    value,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    /// Remove a single key.
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.pop(key);
        }
    }

    /// Remove every key under a namespace prefix.
    pub fn invalidate_prefix(&self, prefix: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            let stale: Vec<String> = cache
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, _)| key.clone())
                .collect();
            for key in stale {
                cache.pop(&key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cache_put_and_get() {
        let cache = ResponseCache::new(10, Duration::from_secs(300));
        assert!(cache.get("properties:1:full").is_none());

        cache.put("properties:1:full", json!({"matriculaId": "1"}));

        let value = cache.get("properties:1:full").unwrap();
        assert_eq!(value["matriculaId"], "1");
    }

    #[test]
    fn cache_ttl_expiry_evicts_on_read() {
        let cache = ResponseCache::new(10, Duration::from_millis(1));
        cache.put("k", json!(1));

        std::thread::sleep(Duration::from_millis(5));

        assert!(cache.get("k").is_none());
    }

    #[test]
    fn cache_invalidate_single_key() {
        let cache = ResponseCache::new(10, Duration::from_secs(300));
        cache.put("k", json!(1));
        cache.invalidate("k");
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn cache_prefix_invalidation_spares_other_namespaces() {
        let cache = ResponseCache::new(10, Duration::from_secs(300));
        cache.put("properties:1:full", json!(1));
        cache.put("properties:owner:0xabc", json!(2));
        cache.put("transfers:9:status", json!(3));

        cache.invalidate_prefix("properties:");

        assert!(cache.get("properties:1:full").is_none());
        assert!(cache.get("properties:owner:0xabc").is_none());
        assert!(cache.get("transfers:9:status").is_some());
    }

    #[test]
    fn cache_capacity_evicts_least_recently_used() {
        let cache = ResponseCache::new(2, Duration::from_secs(300));
        cache.put("a", json!(1));
        cache.put("b", json!(2));
        cache.put("c", json!(3));

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }
}
