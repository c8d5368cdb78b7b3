//! Self-adjusting point cache backed by a splay tree.
//!
//! Every lookup and insert splays: the node holding the requested key, or
//! the last node visited while searching for it, is rotated up to the root.
//! Recently and frequently touched keys therefore sit near the top of the
//! tree, and runs of nearby keys are cheap. Access cost is amortized
//! O(log n).
//!
//! ## Architecture
//!
//! Nodes live in a [`SlotArena`] and link to their children by [`SlotId`].
//! There are no parent links and no recursion: [`SplayCache::get`] and
//! [`SplayCache::put`] use a single top-down pass that splits the search
//! path into a left tree (keys below the target) and a right tree (keys
//! above it), then reassembles them under the final node.
//!
//! ```text
//!   descent toward key k                       reassembly
//!
//!        L (< k)      t       R (> k)                  t
//!      ┌────────┐   ┌───┐   ┌────────┐              /     \
//!      │  ...   │   │   │   │  ...   │            L       R
//!      │   max ─┼─► │   │ ◄─┼─ min   │           / \     / \
//!      └────────┘   └───┘   └────────┘         ..  t.l  t.r ..
//! ```
//!
//! Descent steps, by position of the target relative to `t` and its child:
//!
//! | Step     | Shape                     | Action                          |
//! |----------|---------------------------|---------------------------------|
//! | zig      | target is `t`'s child     | link `t` into the opposite tree |
//! | zig-zig  | child and grandchild same | rotate at `t`, then link        |
//! | zig-zag  | child and grandchild flip | link `t`; next step links child |
//!
//! ## Growth
//!
//! The cache is unbounded: nodes are created on the first `put` of a key,
//! overwritten in place afterwards, and only dropped by [`SplayCache::clear`].
//!
//! ## Example
//!
//! ```
//! use memokit::policy::splay::SplayCache;
//!
//! let mut cache = SplayCache::new();
//! cache.put(5, "a");
//! cache.put(2, "b");
//! cache.put(8, "c");
//!
//! assert_eq!(cache.get(&2), Some(&"b"));
//! assert_eq!(cache.root_key(), Some(&2));
//! ```

use std::cmp::Ordering;
use std::mem;

use tracing::trace;

use crate::ds::{SlotArena, SlotId};
use crate::error::InvariantError;
use crate::traits::CoreCache;

#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::SplayMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::SplayMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, MetricsSnapshotProvider, PeekMetricsReadRecorder, SplayMetricsRecorder,
};

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<SlotId>,
    right: Option<SlotId>,
}

/// Side tree assembled during a top-down splay.
///
/// `attach` is the node whose inner child slot receives the next linked
/// node: the maximum of the left tree, or the minimum of the right tree.
#[derive(Debug, Default, Clone, Copy)]
struct SideTree {
    root: Option<SlotId>,
    attach: Option<SlotId>,
}

/// Unbounded memoization cache keyed by any totally ordered key.
#[derive(Debug)]
pub struct SplayCache<K, V> {
    nodes: SlotArena<Node<K, V>>,
    root: Option<SlotId>,
    #[cfg(feature = "metrics")]
    metrics: SplayMetrics,
}

impl<K: Ord, V> SplayCache<K, V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            nodes: SlotArena::new(),
            root: None,
            #[cfg(feature = "metrics")]
            metrics: SplayMetrics::default(),
        }
    }

    /// Creates an empty cache with room for `capacity` nodes before the
    /// arena reallocates. This is not a bound on size.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            root: None,
            #[cfg(feature = "metrics")]
            metrics: SplayMetrics::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Key currently at the root, i.e. the most recently accessed key or its
    /// nearest neighbour.
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|id| &self.nodes[id].key)
    }

    /// Looks up `key`, splaying on hit and on miss.
    ///
    /// On a miss the nearest key visited during the search becomes the root,
    /// which makes follow-up lookups around `key` cheap.
    ///
    /// ```
    /// use memokit::policy::splay::SplayCache;
    ///
    /// let mut cache = SplayCache::new();
    /// for k in [10, 20, 30] {
    ///     cache.put(k, k * 2);
    /// }
    /// assert_eq!(cache.get(&25), None);
    /// assert_eq!(cache.root_key(), Some(&20));
    /// assert_eq!(cache.get(&30), Some(&60));
    /// assert_eq!(cache.root_key(), Some(&30));
    /// ```
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.splay(key);

        match self.root {
            Some(root) if self.nodes[root].key == *key => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();

                Some(&self.nodes[root].value)
            },
            _ => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();

                None
            },
        }
    }

    /// Looks up `key` without restructuring the tree.
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();

        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => {
                    #[cfg(feature = "metrics")]
                    (&self.metrics).record_peek_found();

                    return Some(&node.value);
                },
            };
        }
        None
    }

    /// Returns `true` if `key` is cached. Does not restructure the tree.
    pub fn contains(&self, key: &K) -> bool {
        self.peek(key).is_some()
    }

    /// Stores `value` under `key`, leaving `key` at the root.
    ///
    /// An existing key is overwritten in place and its previous value
    /// returned. A new key is split in above the nearest neighbour found by
    /// the splay.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        self.splay(&key);
        self.attach_at_root(key, value).1
    }

    /// Memoization helper: returns the cached value for `key`, or computes
    /// and stores it. Either way `key` ends up at the root.
    ///
    /// ```
    /// use memokit::policy::splay::SplayCache;
    ///
    /// let mut cache = SplayCache::new();
    /// assert_eq!(*cache.get_or_insert_with(3, || 9), 9);
    /// assert_eq!(*cache.get_or_insert_with(3, || unreachable!()), 9);
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: K, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        self.splay(&key);

        let id = match self.root {
            Some(root) if self.nodes[root].key == key => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();

                root
            },
            _ => {
                #[cfg(feature = "metrics")]
                {
                    self.metrics.record_get_miss();
                    self.metrics.record_insert_call();
                }

                let value = compute();
                self.attach_at_root(key, value).0
            },
        };
        &self.nodes[id].value
    }

    /// In-order iterator over `(key, value)`; does not restructure the tree.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            nodes: &self.nodes,
            stack: Vec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(SlotId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[id];
            if let Some(left) = node.left {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right {
                stack.push((right, depth + 1));
            }
        }
        deepest
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        trace!(nodes = self.nodes.len(), "clearing splay cache");
        self.nodes.clear();
        self.root = None;
    }

    /// Verifies search-tree ordering and that every allocated node is
    /// reachable from the root exactly once.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut visited = 0usize;
        let mut previous: Option<&K> = None;
        // a cycle would make the walk endless; stop one past the node count
        for (key, _) in self.iter().take(self.nodes.len() + 1) {
            if let Some(prev) = previous {
                if prev >= key {
                    return Err(InvariantError::new(
                        "in-order traversal is not strictly increasing",
                    ));
                }
            }
            previous = Some(key);
            visited += 1;
        }

        if visited != self.nodes.len() {
            return Err(InvariantError::new(format!(
                "{} nodes reachable from root but {} allocated",
                visited,
                self.nodes.len()
            )));
        }
        if self.root.is_none() != self.nodes.is_empty() {
            return Err(InvariantError::new("root presence disagrees with node count"));
        }
        Ok(())
    }

    /// Completes a `put` after `splay(&key)`: overwrites the root if it holds
    /// `key`, otherwise makes a new root that splits the old one around `key`.
    ///
    /// Returns the id of the node now holding `key` and any replaced value.
    fn attach_at_root(&mut self, key: K, value: V) -> (SlotId, Option<V>) {
        let Some(root) = self.root else {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_new();

            let id = self.nodes.insert(Node {
                key,
                value,
                left: None,
                right: None,
            });
            self.root = Some(id);
            return (id, None);
        };

        let node = match key.cmp(&self.nodes[root].key) {
            Ordering::Equal => {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_update();

                let previous = mem::replace(&mut self.nodes[root].value, value);
                return (root, Some(previous));
            },
            Ordering::Less => {
                let left = self.nodes[root].left.take();
                Node {
                    key,
                    value,
                    left,
                    right: Some(root),
                }
            },
            Ordering::Greater => {
                let right = self.nodes[root].right.take();
                Node {
                    key,
                    value,
                    left: Some(root),
                    right,
                }
            },
        };

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_insert_new();
            self.metrics.record_split_insert();
        }

        let id = self.nodes.insert(node);
        self.root = Some(id);
        (id, None)
    }

    /// Top-down splay toward `key`. Afterwards the root is the node holding
    /// `key`, or the last node visited while searching for it.
    fn splay(&mut self, key: &K) {
        let Some(mut t) = self.root else {
            return;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_splay_call();

        let mut left = SideTree::default();
        let mut right = SideTree::default();
        let mut rotations = 0usize;
        let mut links = 0usize;

        loop {
            match key.cmp(&self.nodes[t].key) {
                Ordering::Less => {
                    let Some(mut child) = self.nodes[t].left else {
                        break;
                    };
                    if *key < self.nodes[child].key {
                        // zig-zig
                        t = self.rotate_right(t, child);
                        rotations += 1;
                        match self.nodes[t].left {
                            Some(next) => child = next,
                            None => break,
                        }
                    }
                    self.link_right(&mut right, t);
                    links += 1;
                    t = child;
                },
                Ordering::Greater => {
                    let Some(mut child) = self.nodes[t].right else {
                        break;
                    };
                    if *key > self.nodes[child].key {
                        // zag-zag
                        t = self.rotate_left(t, child);
                        rotations += 1;
                        match self.nodes[t].right {
                            Some(next) => child = next,
                            None => break,
                        }
                    }
                    self.link_left(&mut left, t);
                    links += 1;
                    t = child;
                },
                Ordering::Equal => break,
            }
        }

        // reassemble: t's subtrees become the inner edges of the side trees
        let (t_left, t_right) = (self.nodes[t].left, self.nodes[t].right);
        match left.attach {
            Some(max) => self.nodes[max].right = t_left,
            None => left.root = t_left,
        }
        match right.attach {
            Some(min) => self.nodes[min].left = t_right,
            None => right.root = t_right,
        }
        self.nodes[t].left = left.root;
        self.nodes[t].right = right.root;
        self.root = Some(t);

        #[cfg(feature = "metrics")]
        for _ in 0..rotations {
            self.metrics.record_rotation();
        }
        #[cfg(feature = "metrics")]
        for _ in 0..links {
            self.metrics.record_link_step();
        }

        trace!(rotations, links, "splayed");
    }

    /// Rotates `pivot` (the left child of `id`) above `id`; returns `pivot`.
    fn rotate_right(&mut self, id: SlotId, pivot: SlotId) -> SlotId {
        self.nodes[id].left = self.nodes[pivot].right;
        self.nodes[pivot].right = Some(id);
        pivot
    }

    /// Rotates `pivot` (the right child of `id`) above `id`; returns `pivot`.
    fn rotate_left(&mut self, id: SlotId, pivot: SlotId) -> SlotId {
        self.nodes[id].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(id);
        pivot
    }

    /// Hangs `id` (and its right subtree, all greater than the target) off
    /// the minimum of the right tree.
    fn link_right(&mut self, right: &mut SideTree, id: SlotId) {
        match right.attach {
            Some(min) => self.nodes[min].left = Some(id),
            None => right.root = Some(id),
        }
        right.attach = Some(id);
    }

    /// Hangs `id` (and its left subtree, all less than the target) off the
    /// maximum of the left tree.
    fn link_left(&mut self, left: &mut SideTree, id: SlotId) {
        match left.attach {
            Some(max) => self.nodes[max].right = Some(id),
            None => left.root = Some(id),
        }
        left.attach = Some(id);
    }
}

#[cfg(feature = "metrics")]
impl<K: Ord, V> SplayCache<K, V> {
    pub fn metrics_snapshot(&self) -> SplayMetricsSnapshot {
        SplayMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            clear_calls: self.metrics.clear_calls,
            splay_calls: self.metrics.splay_calls,
            rotations: self.metrics.rotations,
            link_steps: self.metrics.link_steps,
            split_inserts: self.metrics.split_inserts,
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            cache_len: self.nodes.len(),
            depth: self.depth(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K: Ord, V> MetricsSnapshotProvider<SplayMetricsSnapshot> for SplayCache<K, V> {
    fn snapshot(&self) -> SplayMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K: Ord, V> Default for SplayCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> CoreCache<K, V> for SplayCache<K, V> {
    fn put(&mut self, key: K, value: V) -> Option<V> {
        SplayCache::put(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        SplayCache::get(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        SplayCache::peek(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        SplayCache::contains(self, key)
    }

    fn len(&self) -> usize {
        SplayCache::len(self)
    }

    fn clear(&mut self) {
        SplayCache::clear(self)
    }
}

/// In-order iterator over a [`SplayCache`].
pub struct Iter<'a, K, V> {
    nodes: &'a SlotArena<Node<K, V>>,
    stack: Vec<SlotId>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left_spine(&mut self, mut current: Option<SlotId>) {
        while let Some(id) = current {
            self.stack.push(id);
            current = self.nodes[id].left;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let nodes = self.nodes;
        let node = &nodes[id];
        self.push_left_spine(node.right);
        Some((&node.key, &node.value))
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    proptest! {
        /// In-order traversal is strictly increasing after any put sequence.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_in_order_is_sorted(
            keys in prop::collection::vec(-500i32..500, 0..200)
        ) {
            let mut cache = SplayCache::new();
            for k in keys {
                cache.put(k, ());
                let in_order: Vec<i32> = cache.iter().map(|(k, _)| *k).collect();
                prop_assert!(in_order.windows(2).all(|w| w[0] < w[1]));
            }
            prop_assert!(cache.check_invariants().is_ok());
        }

        /// The touched key is the root after put, and after get when present.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_accessed_key_is_root(
            ops in prop::collection::vec((any::<bool>(), 0u16..64), 1..200)
        ) {
            let mut cache = SplayCache::new();
            for (is_put, k) in ops {
                if is_put {
                    cache.put(k, k);
                    prop_assert_eq!(cache.root_key(), Some(&k));
                } else {
                    let present = cache.contains(&k);
                    let hit = cache.get(&k).is_some();
                    prop_assert_eq!(present, hit);
                    if hit {
                        prop_assert_eq!(cache.root_key(), Some(&k));
                    }
                }
            }
        }

        /// A missed lookup leaves the in-order predecessor or successor of
        /// the query at the root.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_miss_roots_at_neighbour(
            keys in prop::collection::btree_set(0u32..1000, 1..120),
            queries in prop::collection::vec(0u32..1000, 1..40)
        ) {
            let mut cache = SplayCache::new();
            for &k in &keys {
                cache.put(k, k);
            }
            for q in queries {
                if keys.contains(&q) {
                    continue;
                }
                prop_assert_eq!(cache.get(&q), None);
                let below = keys.range(..q).next_back();
                let above = keys.range(q..).next();
                let root = cache.root_key();
                prop_assert!(
                    root.is_some() && (root == below || root == above),
                    "query {} rooted at {:?}, neighbours {:?} / {:?}",
                    q, root, below, above
                );
                prop_assert!(cache.check_invariants().is_ok());
            }
            prop_assert_eq!(cache.len(), keys.len());
        }

        /// The cache agrees with an ordered map on every lookup.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_btreemap_model(
            ops in prop::collection::vec((0u8..3, 0u32..50, any::<u32>()), 0..300)
        ) {
            let mut cache = SplayCache::new();
            let mut model = BTreeMap::new();
            for (op, k, v) in ops {
                match op {
                    0 | 1 => {
                        prop_assert_eq!(cache.put(k, v), model.insert(k, v));
                    },
                    _ => {
                        prop_assert_eq!(cache.get(&k), model.get(&k));
                    },
                }
                prop_assert!(cache.check_invariants().is_ok());
            }
            prop_assert_eq!(cache.len(), model.len());
            let pairs: Vec<(u32, u32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
            let expected: Vec<(u32, u32)> = model.into_iter().collect();
            prop_assert_eq!(pairs, expected);
        }
    }
}
