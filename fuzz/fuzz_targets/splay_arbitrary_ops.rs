#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;
use memokit::policy::splay::SplayCache;

// Fuzz arbitrary operation sequences on SplayCache against a BTreeMap model
//
// Every 2-byte chunk is (op, key).
fuzz_target!(|data: &[u8]| {
    let mut cache: SplayCache<u8, u32> = SplayCache::new();
    let mut model: BTreeMap<u8, u32> = BTreeMap::new();

    for (step, chunk) in data.chunks_exact(2).enumerate() {
        let key = chunk[1];
        let value = step as u32;

        match chunk[0] % 4 {
            0 | 1 => {
                assert_eq!(cache.put(key, value), model.insert(key, value));
                assert_eq!(cache.root_key(), Some(&key));
            }
            2 => {
                let hit = cache.get(&key).copied();
                assert_eq!(hit, model.get(&key).copied());
                if hit.is_some() {
                    assert_eq!(cache.root_key(), Some(&key));
                }
            }
            _ => {
                let root = cache.root_key().copied();
                assert_eq!(cache.peek(&key), model.get(&key));
                assert_eq!(cache.root_key().copied(), root);
            }
        }
    }

    assert_eq!(cache.len(), model.len());
    assert!(cache.check_invariants().is_ok());
    assert!(cache.iter().map(|(k, v)| (*k, *v)).eq(model.into_iter()));
});
