//! Bounded caches for gazetteer lookups.
//!
//! Resolving one query hits the same country, place and name rows over and
//! over while the matcher backtracks, so every lookup the access layer
//! performs goes through a [`BoundedCache`]. Eviction is insertion-ordered,
//! not LRU: once full, the oldest entry makes room for the next new key and
//! hits do not reorder anything.

use std::collections::VecDeque;
use std::hash::Hash;

use ahash::{HashMap, HashMapExt};
use parking_lot::Mutex;

/// Capacity for caches keyed by high-cardinality ids (places, names,
/// hierarchy paths).
pub const LARGE_CACHE_CAPACITY: usize = 4096;

/// Capacity for caches whose keys repeat rarely, such as whole-query
/// results.
pub const SMALL_CACHE_CAPACITY: usize = 256;

/// Counters describing cache effectiveness, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

struct CacheInner<K, V> {
    map: HashMap<K, V>,
    order: VecDeque<K>,
    hits: u64,
    misses: u64,
}

/// A thread-safe map bounded to a fixed number of entries.
///
/// Values are cloned out on hit, so they are expected to be cheap to clone
/// (rows, small vectors, `Arc`s). All methods take `&self`; interior
/// locking makes a shared reference enough for concurrent use.
pub struct BoundedCache<K, V> {
    inner: Mutex<CacheInner<K, V>>,
    capacity: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries. A zero capacity
    /// is clamped to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(CacheInner {
                map: HashMap::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
                hits: 0,
                misses: 0,
            }),
            capacity,
        }
    }

    /// Look up a key, cloning the value out on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        match inner.map.get(key).cloned() {
            Some(value) => {
                inner.hits += 1;
                Some(value)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Insert a value, evicting the oldest entry if the cache is full.
    /// Re-inserting an existing key replaces its value without touching
    /// the eviction order.
    pub fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.lock();
        if inner.map.insert(key.clone(), value).is_some() {
            return;
        }
        inner.order.push_back(key);
        if inner.order.len() > self.capacity
            && let Some(oldest) = inner.order.pop_front()
        {
            inner.map.remove(&oldest);
        }
    }

    /// Drop every entry. Hit and miss counters survive a clear.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.map.clear();
        inner.order.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            len: inner.map.len(),
            capacity: self.capacity,
        }
    }
}

impl<K, V> std::fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("BoundedCache")
            .field("len", &inner.map.len())
            .field("capacity", &self.capacity)
            .field("hits", &inner.hits)
            .field("misses", &inner.misses)
            .finish()
    }
}
