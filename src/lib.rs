//! memokit: memoization caches for interval and point queries.
//!
//! Two policies share one trait contract ([`traits::CoreCache`]):
//!
//! - [`RangeLruCache`] caches results for closed intervals `[l, r]` with
//!   least-recently-used eviction. When an index of the underlying data
//!   changes, [`RangeLruCache::invalidate`] drops every interval that covers
//!   it.
//! - [`SplayCache`] caches results for any ordered key in a splay tree, so
//!   hot keys and their neighbours stay close to the root. It never evicts.
//!
//! ```
//! use memokit::{RangeKey, RangeLruCache};
//!
//! let data = [3, 1, 4, 1, 5];
//! let mut sums = RangeLruCache::new(16);
//!
//! let key = RangeKey::new(1, 3);
//! let total = sums.get_or_insert_with(key, || data[1..=3].iter().sum::<i32>());
//! assert_eq!(total, 6);
//!
//! // data[2] changed: every cached interval covering index 2 is stale
//! assert_eq!(sums.invalidate(2), 1);
//! assert!(sums.get(&key).is_none());
//! ```

pub mod builder;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod policy;
pub mod prelude;
#[cfg(feature = "concurrency")]
pub mod sync;
pub mod traits;

pub use crate::error::{ConfigError, InvariantError, KeyError};
pub use crate::policy::range_lru::{RangeKey, RangeLruCache};
pub use crate::policy::splay::SplayCache;
