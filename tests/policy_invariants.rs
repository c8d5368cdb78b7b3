// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Behaviour every cache must share through the `CoreCache` contract, plus
// the capacity-0 edge case of the bounded policy.

use memokit::builder::CacheBuilder;
use memokit::policy::range_lru::{RangeKey, RangeLruCache};
use memokit::policy::splay::SplayCache;
use memokit::traits::{BoundedCache, CoreCache, InvalidatingCache, LruCacheTrait, MutableCache};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// ==============================================
// Shared CoreCache contract
// ==============================================

fn exercise_core_contract<K, C>(cache: &mut C, keys: [K; 3])
where
    K: Clone + std::fmt::Debug,
    C: CoreCache<K, String>,
{
    let [a, b, missing] = keys;

    assert!(cache.is_empty());
    assert_eq!(cache.put(a.clone(), "a".to_string()), None);
    assert_eq!(cache.put(b.clone(), "b".to_string()), None);
    assert_eq!(cache.len(), 2);

    assert_eq!(cache.get(&a).map(String::as_str), Some("a"));
    assert_eq!(cache.peek(&b).map(String::as_str), Some("b"));
    assert!(cache.contains(&a));
    assert!(!cache.contains(&missing));
    assert_eq!(cache.get(&missing), None);
    assert_eq!(cache.get(&missing), None);

    assert_eq!(
        cache.put(a.clone(), "A".to_string()),
        Some("a".to_string()),
        "overwrite must return the previous value"
    );
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&a).map(String::as_str), Some("A"));

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.get(&a), None);
}

#[test]
fn range_lru_honors_core_contract() {
    let mut cache = RangeLruCache::new(8);
    exercise_core_contract(
        &mut cache,
        [RangeKey::new(0, 4), RangeKey::new(2, 2), RangeKey::new(0, 5)],
    );
    cache.check_invariants().unwrap();
}

#[test]
fn splay_honors_core_contract() {
    let mut cache = SplayCache::new();
    exercise_core_contract(&mut cache, [10u64, 3, 7]);
    cache.check_invariants().unwrap();
}

#[test]
fn builder_caches_honor_core_contract() {
    let mut ranges = CacheBuilder::new().capacity(4).build_range_lru::<String>();
    exercise_core_contract(
        &mut ranges,
        [RangeKey::new(1, 1), RangeKey::new(1, 2), RangeKey::new(2, 2)],
    );

    let mut points = CacheBuilder::new().build_splay::<&str, String>();
    exercise_core_contract(&mut points, ["m", "c", "x"]);
}

// ==============================================
// Capacity-0 Behavior
// ==============================================
//
// The range cache accepts capacity 0 through `new` and behaves as a
// pass-through; only the fallible constructors reject it.

mod range_lru_zero_capacity {
    use super::*;

    #[test]
    fn capacity_zero_is_honored() {
        let cache: RangeLruCache<i32> = RangeLruCache::new(0);
        assert_eq!(
            cache.capacity(),
            0,
            "RangeLruCache::new(0) should honor capacity=0, not coerce to {}",
            cache.capacity()
        );
    }

    #[test]
    fn capacity_zero_stores_nothing() {
        let mut cache = RangeLruCache::new(0);
        for i in 0..10 {
            cache.put(RangeKey::new(i, i + 1), i);
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.get(&RangeKey::new(i, i + 1)), None);
        }
        assert_eq!(cache.invalidate(3), 0);
        assert_eq!(cache.pop_lru(), None);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn capacity_zero_rejected_by_fallible_paths() {
        assert!(RangeLruCache::<i32>::try_new(0).is_err());
        assert!(CacheBuilder::new()
            .capacity(0)
            .try_build_range_lru::<i32>()
            .is_err());
    }
}

// ==============================================
// Bounded + invalidating contract
// ==============================================

#[test]
fn generic_bounded_invalidating_cache() {
    fn fill_and_invalidate<C>(cache: &mut C) -> usize
    where
        C: BoundedCache<RangeKey, usize>
            + InvalidatingCache<RangeKey, usize, Index = usize>
            + LruCacheTrait<RangeKey, usize>,
    {
        for i in 0..cache.capacity() * 2 {
            cache.put(RangeKey::new(i, i + 2), i);
            assert!(cache.len() <= cache.capacity());
        }
        cache.invalidate(cache.capacity() + 1)
    }

    let mut cache = RangeLruCache::new(4);
    // live keys: [4,6] [5,7] [6,8] [7,9]; index 5 hits the first two
    assert_eq!(fill_and_invalidate(&mut cache), 2);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.peek_lru(), Some((&RangeKey::new(6, 8), &6)));
    assert_eq!(
        cache.remove_batch(&[RangeKey::new(7, 9), RangeKey::new(0, 0)]),
        vec![Some(7), None]
    );
    cache.check_invariants().unwrap();
}

#[test]
fn lru_order_matches_access_history() {
    let mut cache = RangeLruCache::new(3);
    let a = RangeKey::new(0, 1);
    let b = RangeKey::new(2, 3);
    let c = RangeKey::new(4, 5);
    cache.put(a, 'a');
    cache.put(b, 'b');
    cache.put(c, 'c');

    assert_eq!(cache.recency_rank(&c), Some(0));
    assert_eq!(cache.recency_rank(&a), Some(2));

    cache.get(&a);
    assert!(cache.touch(&b));
    // most recent first: b, a, c
    let order: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
    assert_eq!(order, vec![b, a, c]);

    cache.put(RangeKey::new(6, 7), 'd');
    assert!(!cache.contains(&c));
}

// ==============================================
// Splay ordering survives arbitrary access
// ==============================================

#[test]
fn splay_stays_ordered_under_mixed_access() {
    let mut rng = SmallRng::seed_from_u64(0x2545_f491);
    let mut cache = SplayCache::new();
    for _ in 0..2000 {
        let key: u32 = rng.random_range(0..257);
        if rng.random_bool(0.5) {
            cache.put(key, key * 2);
        } else if let Some(v) = cache.get(&key) {
            assert_eq!(*v, key * 2);
            assert_eq!(cache.root_key(), Some(&key));
        }
    }
    cache.check_invariants().unwrap();
    let keys: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}
