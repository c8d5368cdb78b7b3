#![no_main]

use libfuzzer_sys::fuzz_target;
use memokit::policy::range_lru::{RangeKey, RangeLruCache};

// Fuzz arbitrary operation sequences on RangeLruCache
//
// The first byte picks a capacity; every following 3-byte chunk is
// (op, a, b) with the interval built from a and b.
fuzz_target!(|data: &[u8]| {
    let Some((&first, ops)) = data.split_first() else {
        return;
    };

    let capacity = usize::from(first % 16);
    let mut cache: RangeLruCache<u16> = RangeLruCache::new(capacity);

    for chunk in ops.chunks_exact(3) {
        let (a, b) = (usize::from(chunk[1]), usize::from(chunk[2]));
        let key = RangeKey::new(a.min(b), a.max(b));
        let value = u16::from_le_bytes([chunk[1], chunk[2]]);

        match chunk[0] % 7 {
            0 => {
                cache.put(key, value);
                if capacity > 0 {
                    assert_eq!(cache.peek(&key), Some(&value));
                }
            }
            1 => {
                let expected = cache.peek(&key).copied();
                assert_eq!(cache.get(&key).copied(), expected);
                if expected.is_some() {
                    assert_eq!(cache.recency_rank(&key), Some(0));
                }
            }
            2 => {
                let len = cache.len();
                let dropped = cache.invalidate(a);
                assert_eq!(cache.len(), len - dropped);
                assert!(cache.iter().all(|(k, _)| !k.covers(a)));
            }
            3 => {
                cache.invalidate_range(&key);
                assert!(cache.iter().all(|(k, _)| !k.overlaps(&key)));
            }
            4 => {
                cache.remove(&key);
                assert!(!cache.contains(&key));
            }
            5 => {
                if let Some((k, _)) = cache.pop_lru() {
                    assert!(!cache.contains(&k));
                }
            }
            _ => {
                cache.touch(&key);
            }
        }

        assert!(cache.len() <= capacity);
        assert!(cache.check_invariants().is_ok());
    }
});
