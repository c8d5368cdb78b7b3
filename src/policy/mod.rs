//! Cache policies.
//!
//! - [`range_lru`]: bounded LRU over closed integer intervals, with
//!   point-overlap invalidation.
//! - [`splay`]: unbounded self-adjusting cache for ordered point keys.

pub mod range_lru;
pub mod splay;
