use std::cell::Cell;

/// A counter that can be bumped through `&self`.
///
/// # Safety
/// This type is only safe if all accesses are externally synchronized. The
/// caches are single-threaded, and the `concurrency` wrappers hold a mutex
/// around every call.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}

// SAFETY:
// All shared access to MetricsCell goes through a cache that is either owned
// by one thread or guarded by a mutex. Metrics do not affect correctness.
unsafe impl Sync for MetricsCell {}
unsafe impl Send for MetricsCell {}
