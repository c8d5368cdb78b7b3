//! Thread-safe wrappers (feature `concurrency`).
//!
//! Each wrapper holds one cache behind an `Arc<parking_lot::Mutex<_>>` and
//! takes the lock for every call. Both policies mutate on lookup (LRU order
//! or tree shape), so there is no shared read path and a `RwLock` would buy
//! nothing. Values are returned by clone because references cannot outlive
//! the guard.
//!
//! Cloning a wrapper yields another handle to the same cache.
//!
//! ```
//! use memokit::sync::ConcurrentRangeLruCache;
//! use memokit::RangeKey;
//! use std::thread;
//!
//! let cache = ConcurrentRangeLruCache::new(8);
//! let writer = cache.clone();
//! thread::spawn(move || {
//!     writer.put(RangeKey::new(0, 3), 10u64);
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(cache.get(&RangeKey::new(0, 3)), Some(10));
//! assert_eq!(cache.invalidate(2), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{ConfigError, InvariantError};
use crate::policy::range_lru::{RangeKey, RangeLruCache};
use crate::policy::splay::SplayCache;

/// Shared handle to a [`RangeLruCache`].
pub struct ConcurrentRangeLruCache<V> {
    inner: Arc<Mutex<RangeLruCache<V>>>,
}

impl<V> Clone for ConcurrentRangeLruCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> fmt::Debug for ConcurrentRangeLruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentRangeLruCache")
            .field("len", &cache.len())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}

impl<V: Clone> ConcurrentRangeLruCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self::from_cache(RangeLruCache::new(capacity))
    }

    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        RangeLruCache::try_new(capacity).map(Self::from_cache)
    }

    pub fn from_cache(cache: RangeLruCache<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn get(&self, key: &RangeKey) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    pub fn peek(&self, key: &RangeKey) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    pub fn contains(&self, key: &RangeKey) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn put(&self, key: RangeKey, value: V) -> Option<V> {
        self.inner.lock().put(key, value)
    }

    /// Holds the lock while `compute` runs, so concurrent callers for the
    /// same key compute once.
    pub fn get_or_insert_with<F>(&self, key: RangeKey, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        self.inner.lock().get_or_insert_with(key, compute)
    }

    pub fn invalidate(&self, index: usize) -> usize {
        self.inner.lock().invalidate(index)
    }

    pub fn invalidate_range(&self, mutated: &RangeKey) -> usize {
        self.inner.lock().invalidate_range(mutated)
    }

    pub fn remove(&self, key: &RangeKey) -> Option<V> {
        self.inner.lock().remove(key)
    }

    pub fn pop_lru(&self) -> Option<(RangeKey, V)> {
        self.inner.lock().pop_lru()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    /// Runs `f` with exclusive access to the wrapped cache.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut RangeLruCache<V>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

/// Shared handle to a [`SplayCache`].
pub struct ConcurrentSplayCache<K, V> {
    inner: Arc<Mutex<SplayCache<K, V>>>,
}

impl<K, V> Clone for ConcurrentSplayCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Ord, V> fmt::Debug for ConcurrentSplayCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentSplayCache")
            .field("len", &cache.len())
            .finish_non_exhaustive()
    }
}

impl<K: Ord, V: Clone> Default for ConcurrentSplayCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V: Clone> ConcurrentSplayCache<K, V> {
    pub fn new() -> Self {
        Self::from_cache(SplayCache::new())
    }

    pub fn from_cache(cache: SplayCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().put(key, value)
    }

    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        self.inner.lock().get_or_insert_with(key, compute).clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    /// Runs `f` with exclusive access to the wrapped cache.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut SplayCache<K, V>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
