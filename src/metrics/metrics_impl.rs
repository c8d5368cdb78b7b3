use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{
    CoreMetricsRecorder, PeekMetricsReadRecorder, RangeLruMetricsRecorder, SplayMetricsRecorder,
};

#[derive(Debug, Default)]
pub struct RangeLruMetrics {
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
    pub invalidate_scan_steps: u64,
    pub pop_lru_calls: u64,
    pub pop_lru_found: u64,
    pub touch_calls: u64,
    pub touch_found: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
}

#[derive(Debug, Default)]
pub struct SplayMetrics {
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
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
}

impl CoreMetricsRecorder for RangeLruMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl RangeLruMetricsRecorder for RangeLruMetrics {
    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_invalidate_call(&mut self) {
        self.invalidate_calls += 1;
    }

    fn record_invalidated_entry(&mut self) {
        self.invalidated_entries += 1;
    }

    fn record_invalidate_scan_step(&mut self) {
        self.invalidate_scan_steps += 1;
    }

    fn record_pop_lru_call(&mut self) {
        self.pop_lru_calls += 1;
    }

    fn record_pop_lru_found(&mut self) {
        self.pop_lru_found += 1;
    }

    fn record_touch_call(&mut self) {
        self.touch_calls += 1;
    }

    fn record_touch_found(&mut self) {
        self.touch_found += 1;
    }
}

impl PeekMetricsReadRecorder for &RangeLruMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }
}

impl CoreMetricsRecorder for SplayMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl SplayMetricsRecorder for SplayMetrics {
    fn record_splay_call(&mut self) {
        self.splay_calls += 1;
    }

    fn record_rotation(&mut self) {
        self.rotations += 1;
    }

    fn record_link_step(&mut self) {
        self.link_steps += 1;
    }

    fn record_split_insert(&mut self) {
        self.split_inserts += 1;
    }
}

impl PeekMetricsReadRecorder for &SplayMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }
}
