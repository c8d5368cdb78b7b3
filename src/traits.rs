//! # Cache Trait Hierarchy
//!
//! Both memoization policies answer the same basic contract (`put`, `get`),
//! while operations that only make sense for one of them live in narrower
//! traits.
//!
//! ```text
//!                    ┌───────────────────────────────────┐
//!                    │          CoreCache<K, V>          │
//!                    │                                   │
//!                    │  put(&mut, K, V) → Option<V>      │
//!                    │  get(&mut, &K) → Option<&V>       │
//!                    │  peek(&, &K) → Option<&V>         │
//!                    │  contains(&, &K) → bool           │
//!                    │  len / is_empty / clear           │
//!                    └─────────────────┬─────────────────┘
//!                                      │
//!        ┌─────────────────────────────┼──────────────────────────────┐
//!        ▼                             ▼                              ▼
//!  ┌──────────────────┐   ┌─────────────────────────┐   ┌──────────────────────────┐
//!  │ BoundedCache     │   │ MutableCache            │   │ InvalidatingCache        │
//!  │  capacity()      │   │  remove(&K)             │   │  invalidate(Index)       │
//!  └──────────────────┘   └────────────┬────────────┘   └──────────────────────────┘
//!                                      ▼
//!                         ┌─────────────────────────┐
//!                         │ LruCacheTrait           │
//!                         │  pop_lru / peek_lru     │
//!                         │  touch / recency_rank   │
//!                         └─────────────────────────┘
//! ```
//!
//! | Trait               | RangeLruCache | SplayCache |
//! |---------------------|---------------|------------|
//! | `CoreCache`         | yes           | yes        |
//! | `BoundedCache`      | yes           | no         |
//! | `MutableCache`      | yes           | no         |
//! | `InvalidatingCache` | yes           | no         |
//! | `LruCacheTrait`     | yes           | no         |
//!
//! The splay cache is unbounded and never deletes individual nodes, so it
//! only implements [`CoreCache`].
//!
//! ## Thread Safety
//!
//! No implementation is thread-safe. `get` mutates (recency order or tree
//! shape), so shared access needs exclusive locking; see the `sync` module
//! behind the `concurrency` feature.

/// Core cache operations that all memoization caches support.
///
/// # Example
///
/// ```
/// use memokit::traits::CoreCache;
/// use memokit::policy::splay::SplayCache;
///
/// fn warm<C: CoreCache<u64, u64>>(cache: &mut C, keys: &[u64]) {
///     for &key in keys {
///         cache.put(key, key * key);
///     }
/// }
///
/// let mut cache = SplayCache::new();
/// warm(&mut cache, &[1, 2, 3]);
/// assert_eq!(cache.len(), 3);
/// assert_eq!(CoreCache::get(&mut cache, &3), Some(&9));
/// ```
pub trait CoreCache<K, V> {
    /// Stores `value` under `key`, returning the previous value if the key
    /// was already cached.
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key`. `None` is the miss sentinel.
    ///
    /// May restructure the cache (promotion, splaying) on hit and on miss.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Looks up `key` without touching recency order or tree shape.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool {
        self.peek(key).is_some()
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries.
    fn clear(&mut self);
}

/// Caches with a fixed entry-count bound.
pub trait BoundedCache<K, V>: CoreCache<K, V> {
    /// Maximum number of entries retained after any `put` returns.
    fn capacity(&self) -> usize;
}

/// Caches that support arbitrary key-based removal.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a specific entry, returning its value if it existed.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes several keys; returns the values in key order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}

/// Caches whose entries depend on positions of some external data and must
/// be purged when that data mutates.
///
/// # Example
///
/// ```
/// use memokit::traits::{CoreCache, InvalidatingCache};
/// use memokit::policy::range_lru::{RangeKey, RangeLruCache};
///
/// let mut cache = RangeLruCache::new(8);
/// cache.put(RangeKey::new(0, 5), 10);
/// cache.put(RangeKey::new(6, 9), 4);
///
/// assert_eq!(cache.invalidate(3), 1);
/// assert!(!cache.contains(&RangeKey::new(0, 5)));
/// assert!(cache.contains(&RangeKey::new(6, 9)));
/// ```
pub trait InvalidatingCache<K, V>: CoreCache<K, V> {
    /// Position type of the underlying data.
    type Index;

    /// Removes every entry affected by a mutation at `index` and returns how
    /// many were removed.
    fn invalidate(&mut self, index: Self::Index) -> usize;
}

/// Recency-ordered caches.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without removing it.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` as most recently used; returns `false` on a miss.
    fn touch(&mut self, key: &K) -> bool;

    /// Position in recency order, 0 being most recently used.
    fn recency_rank(&self, key: &K) -> Option<usize>;
}
