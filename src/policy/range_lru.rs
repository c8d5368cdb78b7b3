//! Range-keyed LRU cache with overlap invalidation.
//!
//! Memoizes aggregate queries over an indexed sequence (range sums and the
//! like). Keys are closed intervals `[left, right]`; values are whatever the
//! caller computed for that interval. When the caller mutates position `i`
//! of the underlying data it calls [`RangeLruCache::invalidate`] with `i`,
//! and every cached interval containing `i` is dropped.
//!
//! ## Architecture
//!
//! ```text
//!   map: FxHashMap<RangeKey, SlotId>        list: IntrusiveList<Entry<V>>
//!   ┌──────────┬────────┐
//!   │ [0, 5]   │ id_2   │──────┐         head ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail
//!   │ [2, 8]   │ id_1   │──┐   │                  [2,8]       [0,5]      [10,15]
//!   │ [10, 15] │ id_3   │  │   │                   MRU                      LRU
//!   └──────────┴────────┘  │   │
//!                          └───┴──► O(1) move_to_front / unlink
//! ```
//!
//! ## Operations
//!
//! | Operation          | Effect                                            | Cost |
//! |--------------------|---------------------------------------------------|------|
//! | `get`              | hit: promote to MRU; miss: no side effect         | O(1) |
//! | `put`              | insert/overwrite at MRU, evict LRU on overflow    | O(1) |
//! | `invalidate(i)`    | drop every key with `left <= i <= right`          | O(n) |
//! | `invalidate_range` | drop every key overlapping an interval            | O(n) |
//!
//! Invalidation is deliberately conservative: an entry covering the mutated
//! index is dropped even when its value happens to be unchanged. Values are
//! never patched in place.
//!
//! ## Capacity
//!
//! `len() <= capacity()` holds whenever `put` returns. A capacity of zero is
//! honored: each `put` inserts and then immediately evicts the new entry, so
//! the cache degenerates to a pass-through.
//!
//! ## Example
//!
//! ```
//! use memokit::policy::range_lru::{RangeKey, RangeLruCache};
//!
//! let data = vec![3i64, 1, 4, 1, 5, 9, 2, 6];
//! let mut cache = RangeLruCache::new(16);
//!
//! let key = RangeKey::new(2, 5);
//! let sum = cache.get_or_insert_with(key, || data[2..=5].iter().sum::<i64>());
//! assert_eq!(sum, 19);
//! assert_eq!(cache.get(&key), Some(&19));
//!
//! // position 4 changed: the cached [2, 5] sum is stale
//! cache.invalidate(4);
//! assert_eq!(cache.get(&key), None);
//! ```

use std::fmt;
use std::mem;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{ConfigError, InvariantError, KeyError};
use crate::traits::{BoundedCache, CoreCache, InvalidatingCache, LruCacheTrait, MutableCache};

#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::RangeLruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::RangeLruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, MetricsSnapshotProvider, PeekMetricsReadRecorder,
    RangeLruMetricsRecorder,
};

// Upper bound on up-front allocation; larger caches grow on demand.
const MAX_PREALLOC: usize = 1 << 16;

/// Closed interval `[left, right]` over positions of an indexed sequence.
///
/// `left <= right` always holds: inverted keys cannot be constructed, so the
/// cache never has to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeKey {
    left: usize,
    right: usize,
}

impl RangeKey {
    /// Creates the key `[left, right]`.
    ///
    /// # Panics
    ///
    /// Panics if `left > right`. Use [`RangeKey::try_new`] for untrusted
    /// bounds.
    pub fn new(left: usize, right: usize) -> Self {
        assert!(
            left <= right,
            "inverted range key: left {} is greater than right {}",
            left,
            right
        );
        Self { left, right }
    }

    /// Creates the key `[left, right]`, rejecting `left > right`.
    ///
    /// ```
    /// use memokit::policy::range_lru::RangeKey;
    ///
    /// assert!(RangeKey::try_new(2, 2).is_ok());
    /// assert!(RangeKey::try_new(3, 2).is_err());
    /// ```
    pub fn try_new(left: usize, right: usize) -> Result<Self, KeyError> {
        if left > right {
            return Err(KeyError::new(left, right));
        }
        Ok(Self { left, right })
    }

    /// Single-position key `[index, index]`.
    pub fn point(index: usize) -> Self {
        Self {
            left: index,
            right: index,
        }
    }

    #[inline]
    pub fn left(&self) -> usize {
        self.left
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.right
    }

    /// Number of positions covered, or `None` for `0..=usize::MAX`, whose
    /// count does not fit in a `usize`.
    #[inline]
    pub fn span(&self) -> Option<usize> {
        (self.right - self.left).checked_add(1)
    }

    /// `true` if a mutation at `index` affects this range.
    #[inline]
    pub fn covers(&self, index: usize) -> bool {
        self.left <= index && index <= self.right
    }

    /// `true` if the two closed intervals share at least one position.
    #[inline]
    pub fn overlaps(&self, other: &RangeKey) -> bool {
        self.left <= other.right && other.left <= self.right
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}

impl TryFrom<(usize, usize)> for RangeKey {
    type Error = KeyError;

    fn try_from((left, right): (usize, usize)) -> Result<Self, Self::Error> {
        Self::try_new(left, right)
    }
}

impl From<RangeKey> for (usize, usize) {
    fn from(key: RangeKey) -> Self {
        (key.left, key.right)
    }
}

#[derive(Debug)]
struct Entry<V> {
    key: RangeKey,
    value: V,
}

/// Fixed-capacity LRU cache keyed by [`RangeKey`].
///
/// # Example
///
/// ```
/// use memokit::policy::range_lru::{RangeKey, RangeLruCache};
///
/// let mut cache = RangeLruCache::new(2);
/// cache.put(RangeKey::new(0, 5), 10);
/// cache.put(RangeKey::new(2, 8), 20);
/// cache.put(RangeKey::new(10, 15), 30);
///
/// assert_eq!(cache.get(&RangeKey::new(0, 5)), None);
/// assert_eq!(cache.get(&RangeKey::new(2, 8)), Some(&20));
/// ```
#[derive(Debug)]
pub struct RangeLruCache<V> {
    map: FxHashMap<RangeKey, SlotId>,
    list: IntrusiveList<Entry<V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: RangeLruMetrics,
}

impl<V> RangeLruCache<V> {
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is accepted and turns the cache into a
    /// pass-through.
    pub fn new(capacity: usize) -> Self {
        let prealloc = capacity.min(MAX_PREALLOC);
        Self {
            map: FxHashMap::with_capacity_and_hasher(prealloc, Default::default()),
            list: IntrusiveList::with_capacity(prealloc),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: RangeLruMetrics::default(),
        }
    }

    /// Creates an empty cache, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new(
                "range cache capacity must be greater than zero",
            ));
        }
        Ok(Self::new(capacity))
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if `key` is cached. Does not update recency.
    #[inline]
    pub fn contains(&self, key: &RangeKey) -> bool {
        self.map.contains_key(key)
    }

    /// Looks up `key`, promoting it to most recently used on a hit.
    ///
    /// A miss returns `None` and leaves the cache untouched.
    pub fn get(&mut self, key: &RangeKey) -> Option<&V> {
        let Some(&id) = self.map.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Looks up `key` without updating recency.
    pub fn peek(&self, key: &RangeKey) -> Option<&V> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();

        let id = *self.map.get(key)?;
        let value = self.list.get(id).map(|entry| &entry.value);

        #[cfg(feature = "metrics")]
        if value.is_some() {
            (&self.metrics).record_peek_found();
        }

        value
    }

    /// Stores `value` under `key` as the most recently used entry.
    ///
    /// Overwriting an existing key returns the previous value. Inserting a
    /// new key past capacity evicts exactly one entry, the least recently
    /// used one.
    ///
    /// ```
    /// use memokit::policy::range_lru::{RangeKey, RangeLruCache};
    ///
    /// let mut cache = RangeLruCache::new(4);
    /// assert_eq!(cache.put(RangeKey::new(1, 3), "a"), None);
    /// assert_eq!(cache.put(RangeKey::new(1, 3), "b"), Some("a"));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn put(&mut self, key: RangeKey, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.map.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            self.list.move_to_front(id);
            return self
                .list
                .get_mut(id)
                .map(|entry| mem::replace(&mut entry.value, value));
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let id = self.list.push_front(Entry { key, value });
        self.map.insert(key, id);

        if self.map.len() > self.capacity {
            self.evict_lru();
        }
        None
    }

    /// Memoization helper: returns the cached value for `key`, or computes,
    /// stores, and returns it.
    ///
    /// Returns an owned value since a zero-capacity cache evicts the entry
    /// before this call returns.
    pub fn get_or_insert_with<F>(&mut self, key: RangeKey, compute: F) -> V
    where
        V: Clone,
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value.clone();
        }
        let value = compute();
        self.put(key, value.clone());
        value
    }

    /// Drops every entry whose range contains `index`.
    ///
    /// Call once per mutated position, after the mutation and before the
    /// next lookup. Returns how many entries were dropped; an index outside
    /// every cached range drops nothing.
    pub fn invalidate(&mut self, index: usize) -> usize {
        let purged = self.purge_where(|key| key.covers(index));
        if purged > 0 {
            debug!(index, purged, "invalidated ranges covering mutated index");
        }
        purged
    }

    /// Drops every entry whose range overlaps `mutated`.
    ///
    /// Equivalent to calling [`invalidate`](Self::invalidate) for each
    /// position of `mutated`, in a single scan.
    pub fn invalidate_range(&mut self, mutated: &RangeKey) -> usize {
        let purged = self.purge_where(|key| key.overlaps(mutated));
        if purged > 0 {
            debug!(range = %mutated, purged, "invalidated ranges overlapping mutated range");
        }
        purged
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &RangeKey) -> Option<V> {
        let id = self.map.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(RangeKey, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();

        let entry = self.list.pop_back()?;
        self.map.remove(&entry.key);

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_found();

        Some((entry.key, entry.value))
    }

    /// Returns the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&RangeKey, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Promotes `key` to most recently used without reading it.
    pub fn touch(&mut self, key: &RangeKey) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        let Some(&id) = self.map.get(key) else {
            return false;
        };
        self.list.move_to_front(id);

        #[cfg(feature = "metrics")]
        self.metrics.record_touch_found();

        true
    }

    /// Zero-based recency position of `key`; 0 is most recently used.
    pub fn recency_rank(&self, key: &RangeKey) -> Option<usize> {
        let id = *self.map.get(key)?;
        self.list.position(id)
    }

    /// Entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&RangeKey, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        debug!(entries = self.map.len(), "clearing range cache");
        self.map.clear();
        self.list.clear();
    }

    /// Verifies map/list agreement, link integrity, and the capacity bound.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.validate()?;

        if self.map.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "map holds {} keys but recency list holds {}",
                self.map.len(),
                self.list.len()
            )));
        }
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        for (id, entry) in self.list.iter_entries() {
            if entry.key.left > entry.key.right {
                return Err(InvariantError::new(format!(
                    "inverted key {} in recency list",
                    entry.key
                )));
            }
            if self.map.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "key {} is not indexed at its list slot",
                    entry.key
                )));
            }
        }
        Ok(())
    }

    fn evict_lru(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        if let Some(entry) = self.list.pop_back() {
            self.map.remove(&entry.key);

            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();

            debug!(key = %entry.key, capacity = self.capacity, "evicting LRU range entry");
        }
    }

    fn purge_where(&mut self, stale: impl Fn(&RangeKey) -> bool) -> usize {
        #[cfg(feature = "metrics")]
        self.metrics.record_invalidate_call();

        let mut doomed = Vec::new();
        for (id, entry) in self.list.iter_entries() {
            #[cfg(feature = "metrics")]
            self.metrics.record_invalidate_scan_step();

            if stale(&entry.key) {
                doomed.push(id);
            }
        }

        for &id in &doomed {
            if let Some(entry) = self.list.remove(id) {
                self.map.remove(&entry.key);

                #[cfg(feature = "metrics")]
                self.metrics.record_invalidated_entry();
            }
        }
        doomed.len()
    }
}

#[cfg(feature = "metrics")]
impl<V> RangeLruCache<V> {
    pub fn metrics_snapshot(&self) -> RangeLruMetricsSnapshot {
        RangeLruMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            clear_calls: self.metrics.clear_calls,
            invalidate_calls: self.metrics.invalidate_calls,
            invalidated_entries: self.metrics.invalidated_entries,
            invalidate_scan_steps: self.metrics.invalidate_scan_steps,
            pop_lru_calls: self.metrics.pop_lru_calls,
            pop_lru_found: self.metrics.pop_lru_found,
            touch_calls: self.metrics.touch_calls,
            touch_found: self.metrics.touch_found,
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            cache_len: self.map.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<V> MetricsSnapshotProvider<RangeLruMetricsSnapshot> for RangeLruCache<V> {
    fn snapshot(&self) -> RangeLruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<V> CoreCache<RangeKey, V> for RangeLruCache<V> {
    fn put(&mut self, key: RangeKey, value: V) -> Option<V> {
        RangeLruCache::put(self, key, value)
    }

    fn get(&mut self, key: &RangeKey) -> Option<&V> {
        RangeLruCache::get(self, key)
    }

    fn peek(&self, key: &RangeKey) -> Option<&V> {
        RangeLruCache::peek(self, key)
    }

    fn contains(&self, key: &RangeKey) -> bool {
        RangeLruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        RangeLruCache::len(self)
    }

    fn clear(&mut self) {
        RangeLruCache::clear(self)
    }
}

impl<V> BoundedCache<RangeKey, V> for RangeLruCache<V> {
    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<V> MutableCache<RangeKey, V> for RangeLruCache<V> {
    fn remove(&mut self, key: &RangeKey) -> Option<V> {
        RangeLruCache::remove(self, key)
    }
}

impl<V> InvalidatingCache<RangeKey, V> for RangeLruCache<V> {
    type Index = usize;

    fn invalidate(&mut self, index: usize) -> usize {
        RangeLruCache::invalidate(self, index)
    }
}

impl<V> LruCacheTrait<RangeKey, V> for RangeLruCache<V> {
    fn pop_lru(&mut self) -> Option<(RangeKey, V)> {
        RangeLruCache::pop_lru(self)
    }

    fn peek_lru(&self) -> Option<(&RangeKey, &V)> {
        RangeLruCache::peek_lru(self)
    }

    fn touch(&mut self, key: &RangeKey) -> bool {
        RangeLruCache::touch(self, key)
    }

    fn recency_rank(&self, key: &RangeKey) -> Option<usize> {
        RangeLruCache::recency_rank(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(left: usize, right: usize) -> RangeKey {
        RangeKey::new(left, right)
    }

    // ==============================================
    // RangeKey
    // ==============================================

    #[test]
    fn range_key_covers_is_inclusive() {
        let k = key(2, 5);
        assert!(!k.covers(1));
        assert!(k.covers(2));
        assert!(k.covers(5));
        assert!(!k.covers(6));
        assert_eq!(k.span(), Some(4));
    }

    #[test]
    fn range_key_full_domain_span_does_not_overflow() {
        let full = key(0, usize::MAX);
        assert_eq!(full.span(), None);
        assert!(full.covers(0));
        assert!(full.covers(usize::MAX));
        assert_eq!(key(1, usize::MAX).span(), Some(usize::MAX));
        assert_eq!(RangeKey::point(usize::MAX).span(), Some(1));
    }

    #[test]
    fn range_key_overlap_is_symmetric() {
        assert!(key(0, 5).overlaps(&key(5, 9)));
        assert!(key(5, 9).overlaps(&key(0, 5)));
        assert!(key(3, 3).overlaps(&key(0, 9)));
        assert!(!key(0, 4).overlaps(&key(5, 9)));
    }

    #[test]
    fn range_key_conversions() {
        let k: RangeKey = (1, 4).try_into().unwrap();
        assert_eq!(<(usize, usize)>::from(k), (1, 4));
        assert_eq!(k.to_string(), "[1, 4]");
        assert_eq!(RangeKey::point(7), key(7, 7));

        let err = RangeKey::try_from((4, 1)).unwrap_err();
        assert_eq!((err.left(), err.right()), (4, 1));
    }

    #[test]
    #[should_panic(expected = "inverted range key")]
    fn range_key_new_rejects_inverted_bounds() {
        let _ = RangeKey::new(5, 0);
    }

    // ==============================================
    // Basic get / put
    // ==============================================

    #[test]
    fn put_then_get_round_trips() {
        let mut cache = RangeLruCache::new(4);
        cache.put(key(0, 5), 10);
        assert_eq!(cache.get(&key(0, 5)), Some(&10));
        assert_eq!(cache.peek(&key(0, 5)), Some(&10));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn miss_has_no_side_effect() {
        let mut cache = RangeLruCache::new(2);
        cache.put(key(0, 1), 1);
        cache.put(key(2, 3), 2);

        assert_eq!(cache.get(&key(4, 5)), None);
        assert_eq!(cache.get(&key(4, 5)), None);
        assert_eq!(cache.recency_rank(&key(2, 3)), Some(0));
        assert_eq!(cache.recency_rank(&key(0, 1)), Some(1));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn overwrite_promotes_and_returns_previous() {
        let mut cache = RangeLruCache::new(2);
        cache.put(key(0, 5), 10);
        cache.put(key(2, 8), 20);

        assert_eq!(cache.put(key(0, 5), 11), Some(10));
        assert_eq!(cache.recency_rank(&key(0, 5)), Some(0));

        // [2, 8] is now the LRU entry
        cache.put(key(10, 15), 30);
        assert!(!cache.contains(&key(2, 8)));
        assert_eq!(cache.get(&key(0, 5)), Some(&11));
    }

    #[test]
    fn capacity_two_evicts_oldest() {
        let mut cache = RangeLruCache::new(2);
        cache.put(key(0, 5), 10);
        cache.put(key(2, 8), 20);
        cache.put(key(10, 15), 30);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key(0, 5)), None);
        assert_eq!(cache.get(&key(2, 8)), Some(&20));
        assert_eq!(cache.get(&key(10, 15)), Some(&30));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn get_hit_protects_from_eviction() {
        let mut cache = RangeLruCache::new(2);
        cache.put(key(0, 5), 10);
        cache.put(key(2, 8), 20);
        cache.get(&key(0, 5));
        cache.put(key(10, 15), 30);

        assert!(cache.contains(&key(0, 5)));
        assert!(!cache.contains(&key(2, 8)));
    }

    #[test]
    fn peek_does_not_promote() {
        let mut cache = RangeLruCache::new(2);
        cache.put(key(0, 5), 10);
        cache.put(key(2, 8), 20);
        assert_eq!(cache.peek(&key(0, 5)), Some(&10));
        cache.put(key(10, 15), 30);

        assert!(!cache.contains(&key(0, 5)));
    }

    #[test]
    fn zero_capacity_is_pass_through() {
        let mut cache = RangeLruCache::new(0);
        assert_eq!(cache.put(key(0, 5), 10), None);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&key(0, 5)), None);
        assert_eq!(cache.capacity(), 0);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn try_new_rejects_zero_capacity() {
        assert!(RangeLruCache::<i64>::try_new(0).is_err());
        assert_eq!(RangeLruCache::<i64>::try_new(3).unwrap().capacity(), 3);
    }

    // ==============================================
    // Invalidation
    // ==============================================

    #[test]
    fn invalidate_inside_range_purges_it() {
        let mut cache = RangeLruCache::new(4);
        cache.put(key(0, 5), 10);
        assert_eq!(cache.invalidate(3), 1);
        assert_eq!(cache.get(&key(0, 5)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_purges_on_both_endpoints() {
        let mut cache = RangeLruCache::new(4);
        cache.put(key(2, 6), 1);
        assert_eq!(cache.invalidate(6), 1);

        cache.put(key(2, 6), 1);
        assert_eq!(cache.invalidate(2), 1);
    }

    #[test]
    fn invalidate_leaves_disjoint_ranges() {
        let mut cache = RangeLruCache::new(8);
        cache.put(key(0, 5), 10);
        cache.put(key(3, 9), 20);
        cache.put(key(6, 9), 30);
        cache.put(key(11, 12), 40);

        assert_eq!(cache.invalidate(4), 2);
        assert_eq!(cache.get(&key(0, 5)), None);
        assert_eq!(cache.get(&key(3, 9)), None);
        assert_eq!(cache.get(&key(6, 9)), Some(&30));
        assert_eq!(cache.get(&key(11, 12)), Some(&40));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn invalidate_out_of_domain_is_noop() {
        let mut cache = RangeLruCache::new(4);
        cache.put(key(0, 5), 10);
        assert_eq!(cache.invalidate(1_000), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_keeps_recency_of_survivors() {
        let mut cache = RangeLruCache::new(3);
        cache.put(key(0, 1), 1);
        cache.put(key(5, 6), 2);
        cache.put(key(8, 9), 3);
        cache.invalidate(5);

        // room for one more without evicting
        cache.put(key(20, 21), 4);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.peek_lru(), Some((&key(0, 1), &1)));
    }

    #[test]
    fn invalidate_range_matches_pointwise_invalidation() {
        let mut bulk = RangeLruCache::new(8);
        let mut pointwise = RangeLruCache::new(8);
        for k in [key(0, 2), key(3, 4), key(5, 9), key(10, 10)] {
            bulk.put(k, k.left());
            pointwise.put(k, k.left());
        }

        bulk.invalidate_range(&key(4, 6));
        for i in 4..=6 {
            pointwise.invalidate(i);
        }

        let mut a: Vec<_> = bulk.iter().map(|(k, _)| *k).collect();
        let mut b: Vec<_> = pointwise.iter().map(|(k, _)| *k).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(a, vec![key(0, 2), key(10, 10)]);
    }

    // ==============================================
    // LRU helpers
    // ==============================================

    #[test]
    fn pop_lru_and_touch() {
        let mut cache = RangeLruCache::new(3);
        cache.put(key(0, 0), "a");
        cache.put(key(1, 1), "b");
        cache.put(key(2, 2), "c");

        assert!(cache.touch(&key(0, 0)));
        assert!(!cache.touch(&key(9, 9)));
        assert_eq!(cache.pop_lru(), Some((key(1, 1), "b")));
        assert_eq!(cache.pop_lru(), Some((key(2, 2), "c")));
        assert_eq!(cache.pop_lru(), Some((key(0, 0), "a")));
        assert_eq!(cache.pop_lru(), None);
    }

    #[test]
    fn remove_and_clear() {
        let mut cache = RangeLruCache::new(3);
        cache.put(key(0, 3), 1);
        cache.put(key(4, 7), 2);

        assert_eq!(cache.remove(&key(0, 3)), Some(1));
        assert_eq!(cache.remove(&key(0, 3)), None);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.peek_lru(), None);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn iter_runs_mru_to_lru() {
        let mut cache = RangeLruCache::new(3);
        cache.put(key(0, 0), 0);
        cache.put(key(1, 1), 1);
        cache.put(key(2, 2), 2);
        cache.get(&key(0, 0));

        let order: Vec<_> = cache.iter().map(|(_, v)| *v).collect();
        assert_eq!(order, vec![0, 2, 1]);
    }

    #[test]
    fn get_or_insert_with_computes_once() {
        let mut cache = RangeLruCache::new(4);
        let mut calls = 0;

        let first = cache.get_or_insert_with(key(0, 3), || {
            calls += 1;
            42
        });
        let second = cache.get_or_insert_with(key(0, 3), || {
            calls += 1;
            0
        });

        assert_eq!((first, second), (42, 42));
        assert_eq!(calls, 1);
    }

    #[test]
    fn get_or_insert_with_zero_capacity_still_returns_value() {
        let mut cache = RangeLruCache::new(0);
        assert_eq!(cache.get_or_insert_with(key(0, 3), || 7), 7);
        assert!(cache.is_empty());
    }

    #[test]
    fn trait_objects_dispatch_to_inherent_methods() {
        fn drop_affected<C: InvalidatingCache<RangeKey, i32, Index = usize>>(
            cache: &mut C,
            index: usize,
        ) -> usize {
            cache.invalidate(index)
        }

        let mut cache = RangeLruCache::new(2);
        CoreCache::put(&mut cache, key(0, 4), 1);
        assert_eq!(BoundedCache::capacity(&cache), 2);
        assert_eq!(drop_affected(&mut cache, 2), 1);
        assert!(CoreCache::is_empty(&cache));
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_hits_evictions_and_invalidations() {
        let mut cache = RangeLruCache::new(1);
        cache.put(key(0, 5), 1);
        cache.get(&key(0, 5));
        cache.get(&key(1, 1));
        cache.put(key(6, 9), 2);
        cache.invalidate(7);

        let snap = cache.metrics_snapshot();
        assert_eq!(snap.get_hits, 1);
        assert_eq!(snap.get_misses, 1);
        assert_eq!(snap.evicted_entries, 1);
        assert_eq!(snap.invalidated_entries, 1);
        assert_eq!(snap.invalidate_scan_steps, 1);
        assert_eq!(snap.cache_len, 0);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_count_peeks_without_touching_gets() {
        let mut cache = RangeLruCache::new(2);
        cache.put(key(0, 3), 10);
        assert_eq!(cache.peek(&key(0, 3)), Some(&10));
        assert_eq!(cache.peek(&key(0, 3)), Some(&10));
        assert_eq!(cache.peek(&key(4, 4)), None);

        let snap = cache.metrics_snapshot();
        assert_eq!(snap.peek_calls, 3);
        assert_eq!(snap.peek_found, 2);
        assert_eq!(snap.get_calls, 0);
    }
}
