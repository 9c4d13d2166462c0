//! TTL cache with FIFO capacity eviction.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default maximum number of entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// A cached payload and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub payload: V,
    pub stored_at: Instant,
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CacheStats {
    /// Entries currently held (including any not yet evicted past their TTL).
    pub size: usize,
    /// Capacity.
    pub max_size: usize,
    /// Entry lifetime in milliseconds.
    pub timeout: u64,
}

/// Bounded in-memory cache.
///
/// Expired entries are dropped on read. When a new key would exceed capacity
/// the oldest-inserted entry is evicted; reads never change eviction order.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    order: VecDeque<String>,
    ttl: Duration,
    max_entries: usize,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }
}

impl<V> MemoryCache<V> {
    /// Create a cache. A capacity of zero is treated as one.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self { entries: HashMap::with_capacity(max_entries), order: VecDeque::with_capacity(max_entries), ttl, max_entries }
    }

    /// Look up a fresh entry, removing it if it has outlived the TTL.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let expired = self.entries.get(key)?.stored_at.elapsed() > self.ttl;
        if expired {
            tracing::debug!(key, "cache entry expired");
            self.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| &entry.payload)
    }

    /// Store a payload.
    ///
    /// Overwriting an existing key refreshes its timestamp but keeps its
    /// position in the eviction order. Returns the evicted key, if any.
    pub fn insert(&mut self, key: String, payload: V) -> Option<String> {
        let stored_at = Instant::now();

        if let Some(entry) = self.entries.get_mut(&key) {
            *entry = CacheEntry { payload, stored_at };
            return None;
        }

        let evicted = if self.entries.len() >= self.max_entries { self.evict_oldest() } else { None };

        self.order.push_back(key.clone());
        self.entries.insert(key, CacheEntry { payload, stored_at });

        evicted
    }

    /// Remove an entry.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(entry.payload)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats { size: self.entries.len(), max_size: self.max_entries, timeout: self.ttl.as_millis() as u64 }
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let oldest = self.order.pop_front()?;
        self.entries.remove(&oldest);
        tracing::debug!(key = %oldest, "evicted oldest cache entry");
        Some(oldest)
    }
}
