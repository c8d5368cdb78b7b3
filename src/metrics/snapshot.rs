#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RangeLruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub clear_calls: u64,

    pub invalidate_calls: u64,
    pub invalidated_entries: u64,
    pub invalidate_scan_steps: u64, // entries examined across all invalidate calls

    pub pop_lru_calls: u64,
    pub pop_lru_found: u64,
    pub touch_calls: u64,
    pub touch_found: u64,
    pub peek_calls: u64,
    pub peek_found: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

impl RangeLruMetricsSnapshot {
    /// Fraction of `get` calls that hit; 0.0 before the first call.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SplayMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub clear_calls: u64,

    pub splay_calls: u64,
    pub rotations: u64,
    pub link_steps: u64,
    pub split_inserts: u64,
    pub peek_calls: u64,
    pub peek_found: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub depth: usize,
}

impl SplayMetricsSnapshot {
    /// Fraction of `get` calls that hit; 0.0 before the first call.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}
