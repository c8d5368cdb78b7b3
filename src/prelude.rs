pub use crate::builder::{CacheBuilder, CachePolicy};
pub use crate::error::{ConfigError, InvariantError, KeyError};
pub use crate::policy::range_lru::{RangeKey, RangeLruCache};
pub use crate::policy::splay::SplayCache;
pub use crate::traits::{BoundedCache, CoreCache, InvalidatingCache, LruCacheTrait, MutableCache};

#[cfg(feature = "concurrency")]
pub use crate::sync::{ConcurrentRangeLruCache, ConcurrentSplayCache};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::{RangeLruMetricsSnapshot, SplayMetricsSnapshot};
