//! Cache construction from code or configuration.
//!
//! [`CacheBuilder`] collects construction parameters and builds either
//! policy. [`CachePolicy`] names a policy together with its parameters and
//! parses from short strings, for callers that choose a policy from a config
//! file or command line.
//!
//! ## Example
//!
//! ```rust
//! use memokit::builder::{CacheBuilder, CachePolicy};
//! use memokit::policy::range_lru::RangeKey;
//!
//! let mut ranges = CacheBuilder::new().capacity(64).build_range_lru::<u64>();
//! ranges.put(RangeKey::new(0, 9), 45);
//! assert_eq!(ranges.get(&RangeKey::new(0, 9)), Some(&45));
//!
//! let mut points = CacheBuilder::new().build_splay::<u64, u64>();
//! points.put(7, 13);
//! assert_eq!(points.get(&7), Some(&13));
//!
//! let policy: CachePolicy = "range-lru:64".parse().unwrap();
//! assert_eq!(policy, CachePolicy::RangeLru { capacity: 64 });
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::policy::range_lru::RangeLruCache;
use crate::policy::splay::SplayCache;

/// Capacity used by [`CacheBuilder::build_range_lru`] when none was set.
pub const DEFAULT_RANGE_CAPACITY: usize = 1024;

/// Available cache policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Bounded LRU over interval keys.
    RangeLru { capacity: usize },
    /// Unbounded splay tree over ordered point keys.
    Splay,
}

impl CachePolicy {
    /// Rejects parameters the matching `try_build_*` call would reject.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            CachePolicy::RangeLru { capacity: 0 } => Err(ConfigError::new(
                "range-lru policy requires a capacity greater than zero",
            )),
            _ => Ok(()),
        }
    }

    /// Builder preloaded with this policy's parameters.
    pub fn builder(&self) -> CacheBuilder {
        match *self {
            CachePolicy::RangeLru { capacity } => CacheBuilder::new().capacity(capacity),
            CachePolicy::Splay => CacheBuilder::new(),
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachePolicy::RangeLru { capacity } => write!(f, "range-lru:{}", capacity),
            CachePolicy::Splay => f.write_str("splay"),
        }
    }
}

/// Parses `splay` or `range-lru:<capacity>`.
impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("splay") {
            return Ok(CachePolicy::Splay);
        }

        let Some((name, capacity)) = s.split_once(':') else {
            return Err(ConfigError::new(format!(
                "unknown cache policy {:?}; expected \"splay\" or \"range-lru:<capacity>\"",
                s
            )));
        };
        if !name.trim().eq_ignore_ascii_case("range-lru") {
            return Err(ConfigError::new(format!("unknown cache policy {:?}", name)));
        }
        let capacity = capacity.trim().parse::<usize>().map_err(|err| {
            ConfigError::new(format!("invalid range-lru capacity {:?}: {}", capacity, err))
        })?;

        let policy = CachePolicy::RangeLru { capacity };
        policy.validate()?;
        Ok(policy)
    }
}

/// Builder for cache instances.
#[derive(Debug, Clone, Default)]
pub struct CacheBuilder {
    capacity: Option<usize>,
}

impl CacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of entries for bounded policies.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Builds a range cache. An unset capacity falls back to
    /// [`DEFAULT_RANGE_CAPACITY`]; an explicit zero is honored.
    pub fn build_range_lru<V>(self) -> RangeLruCache<V> {
        RangeLruCache::new(self.capacity.unwrap_or(DEFAULT_RANGE_CAPACITY))
    }

    /// Builds a range cache, rejecting an unset or zero capacity.
    ///
    /// ```rust
    /// use memokit::builder::CacheBuilder;
    ///
    /// assert!(CacheBuilder::new().try_build_range_lru::<u8>().is_err());
    /// assert!(CacheBuilder::new().capacity(0).try_build_range_lru::<u8>().is_err());
    /// assert!(CacheBuilder::new().capacity(8).try_build_range_lru::<u8>().is_ok());
    /// ```
    pub fn try_build_range_lru<V>(self) -> Result<RangeLruCache<V>, ConfigError> {
        let capacity = self
            .capacity
            .ok_or_else(|| ConfigError::new("range cache capacity was not set"))?;
        RangeLruCache::try_new(capacity)
    }

    /// Builds a splay cache. The capacity, if set, only presizes storage.
    pub fn build_splay<K: Ord, V>(self) -> SplayCache<K, V> {
        match self.capacity {
            Some(capacity) => SplayCache::with_capacity(capacity),
            None => SplayCache::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::range_lru::RangeKey;
    use crate::traits::CoreCache;

    #[test]
    fn build_range_lru_honors_explicit_capacity() {
        let cache = CacheBuilder::new().capacity(3).build_range_lru::<u32>();
        assert_eq!(cache.capacity(), 3);

        let zero = CacheBuilder::new().capacity(0).build_range_lru::<u32>();
        assert_eq!(zero.capacity(), 0);
    }

    #[test]
    fn build_range_lru_defaults_capacity() {
        let cache = CacheBuilder::new().build_range_lru::<u32>();
        assert_eq!(cache.capacity(), DEFAULT_RANGE_CAPACITY);
    }

    #[test]
    fn try_build_range_lru_rejects_missing_and_zero() {
        let missing = CacheBuilder::new().try_build_range_lru::<u32>().unwrap_err();
        assert!(missing.message().contains("not set"));

        let zero = CacheBuilder::new()
            .capacity(0)
            .try_build_range_lru::<u32>()
            .unwrap_err();
        assert!(zero.message().contains("greater than zero"));
    }

    #[test]
    fn built_caches_behave_through_trait() {
        let mut ranges = CacheBuilder::new().capacity(1).build_range_lru::<&str>();
        CoreCache::put(&mut ranges, RangeKey::new(0, 1), "a");
        CoreCache::put(&mut ranges, RangeKey::new(2, 3), "b");
        assert_eq!(CoreCache::len(&ranges), 1);
        assert!(!CoreCache::contains(&ranges, &RangeKey::new(0, 1)));

        let mut points = CacheBuilder::new().capacity(16).build_splay::<i32, &str>();
        CoreCache::put(&mut points, 1, "x");
        assert_eq!(CoreCache::get(&mut points, &1), Some(&"x"));
    }

    #[test]
    fn policy_parses_and_displays() {
        assert_eq!("splay".parse::<CachePolicy>(), Ok(CachePolicy::Splay));
        assert_eq!(
            " Range-LRU: 32 ".parse::<CachePolicy>(),
            Ok(CachePolicy::RangeLru { capacity: 32 })
        );

        for policy in [CachePolicy::Splay, CachePolicy::RangeLru { capacity: 5 }] {
            assert_eq!(policy.to_string().parse::<CachePolicy>(), Ok(policy));
        }
    }

    #[test]
    fn policy_parse_errors() {
        assert!("lfu".parse::<CachePolicy>().is_err());
        assert!("lfu:3".parse::<CachePolicy>().is_err());
        assert!("range-lru:abc".parse::<CachePolicy>().is_err());
        assert!("range-lru:0".parse::<CachePolicy>().is_err());
    }

    #[test]
    fn policy_builder_carries_capacity() {
        let policy = CachePolicy::RangeLru { capacity: 9 };
        assert!(policy.validate().is_ok());
        let cache = policy.builder().try_build_range_lru::<u8>().unwrap();
        assert_eq!(cache.capacity(), 9);

        assert!(CachePolicy::RangeLru { capacity: 0 }.validate().is_err());
        assert!(CachePolicy::Splay.validate().is_ok());
    }
}
