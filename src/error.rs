//! Error types for the memokit library.
//!
//! Cache lookups never fail: a miss is `None`. Errors only appear at the
//! edges, when constructing keys or caches from caller-supplied parameters,
//! and from the `check_invariants` methods used by tests and fuzzers.
//!
//! ## Key Components
//!
//! - [`KeyError`]: Returned when an interval key would have `left > right`.
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (e.g. zero capacity through a fallible constructor).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated.
//!
//! ## Example Usage
//!
//! ```
//! use memokit::error::{ConfigError, KeyError};
//! use memokit::policy::range_lru::{RangeKey, RangeLruCache};
//!
//! let cache: Result<RangeLruCache<i64>, ConfigError> = RangeLruCache::try_new(100);
//! assert!(cache.is_ok());
//!
//! let bad: Result<RangeKey, KeyError> = RangeKey::try_new(9, 3);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` on the cache types (e.g.
/// [`SplayCache::check_invariants`](crate::policy::splay::SplayCache::check_invariants)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`RangeLruCache::try_new`](crate::policy::range_lru::RangeLruCache::try_new)
/// and [`CacheBuilder::try_build_range_lru`](crate::builder::CacheBuilder::try_build_range_lru).
///
/// # Example
///
/// ```
/// use memokit::policy::range_lru::RangeLruCache;
///
/// let err = RangeLruCache::<u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// KeyError
// ---------------------------------------------------------------------------

/// Error returned when an interval key is inverted (`left > right`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyError {
    left: usize,
    right: usize,
}

impl KeyError {
    #[inline]
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    #[inline]
    pub fn left(&self) -> usize {
        self.left
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.right
    }
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inverted range key: left {} is greater than right {}",
            self.left, self.right
        )
    }
}

impl std::error::Error for KeyError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
