//! Interval sums over a mutable array, memoized in a `RangeLruCache`.
//!
//! Run with `RUST_LOG=memokit=debug cargo run --example range_sums` to see
//! evictions and invalidations.

use memokit::builder::CacheBuilder;
use memokit::policy::range_lru::{RangeKey, RangeLruCache};
use tracing_subscriber::EnvFilter;

fn range_sum(data: &[i64], cache: &mut RangeLruCache<i64>, left: usize, right: usize) -> i64 {
    let key = RangeKey::new(left, right);
    cache.get_or_insert_with(key, || data[left..=right].iter().sum())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut data: Vec<i64> = (1..=10).collect();
    let mut cache = CacheBuilder::new().capacity(2).build_range_lru::<i64>();

    println!("sum[0, 4] = {}", range_sum(&data, &mut cache, 0, 4));
    println!("sum[2, 8] = {}", range_sum(&data, &mut cache, 2, 8));
    println!("sum[5, 9] = {}", range_sum(&data, &mut cache, 5, 9));
    println!("cached [0, 4]? {}", cache.contains(&RangeKey::new(0, 4)));

    data[6] = 100;
    let dropped = cache.invalidate(6);
    println!("data[6] = 100, dropped {} cached ranges", dropped);
    println!("sum[5, 9] = {}", range_sum(&data, &mut cache, 5, 9));
}

// Expected output:
// sum[0, 4] = 15
// sum[2, 8] = 42
// sum[5, 9] = 40
// cached [0, 4]? false
// data[6] = 100, dropped 2 cached ranges
// sum[5, 9] = 133
//
// Explanation: capacity=2, so caching [5, 9] evicts [0, 4]. Index 6 lies in
// both [2, 8] and [5, 9], so both are dropped and [5, 9] is recomputed.
