//! Recursive Fibonacci memoized in a `SplayCache`.
//!
//! Run with `RUST_LOG=memokit=trace cargo run --example splay_fibonacci` to
//! see every splay.

use memokit::policy::splay::SplayCache;
use tracing_subscriber::EnvFilter;

fn fib(n: u64, cache: &mut SplayCache<u64, u128>) -> u128 {
    if let Some(&hit) = cache.get(&n) {
        return hit;
    }
    let value = if n < 2 {
        u128::from(n)
    } else {
        fib(n - 1, cache) + fib(n - 2, cache)
    };
    cache.put(n, value);
    value
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut cache = SplayCache::new();
    println!("fib(90) = {}", fib(90, &mut cache));
    println!("cached keys: {}, depth: {}", cache.len(), cache.depth());

    println!("fib(10) = {}", fib(10, &mut cache));
    println!("root after lookup: {:?}", cache.root_key());
}

// Expected output:
// fib(90) = 2880067194370816120
// cached keys: 91, depth: 91
// fib(10) = 55
// root after lookup: Some(10)
//
// Explanation: keys are inserted in increasing order (fib(0) and fib(1)
// first), so the tree starts as a left-leaning chain rooted at 90. Looking
// up 10 splays it to the root and roughly halves the chain.
