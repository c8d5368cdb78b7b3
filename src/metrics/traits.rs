//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting, and export are split into small traits so policy
//! code only ever writes counters.
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │     CoreMetricsRecorder     │
//!                    │  get_hit/get_miss/insert    │
//!                    │  clear                      │
//!                    └──────────────┬──────────────┘
//!                                   │
//!                ┌──────────────────┴──────────────────┐
//!                ▼                                     ▼
//!   ┌──────────────────────────┐          ┌──────────────────────────┐
//!   │ RangeLruMetricsRecorder  │          │ SplayMetricsRecorder     │
//!   │ evict/invalidate         │          │ splay/rotation/link      │
//!   │ pop_lru/touch            │          │                          │
//!   └──────────────────────────┘          └──────────────────────────┘
//!
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (tests)                      │    │ (monitoring)                 │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Common counters for any cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_clear(&mut self);
}

/// Counters for `&self` lookups (uses interior mutability).
pub trait PeekMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
}

/// Metrics for the range-keyed LRU, the only bounded policy.
pub trait RangeLruMetricsRecorder: CoreMetricsRecorder {
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_invalidate_call(&mut self);
    fn record_invalidated_entry(&mut self);
    fn record_invalidate_scan_step(&mut self);
    fn record_pop_lru_call(&mut self);
    fn record_pop_lru_found(&mut self);
    fn record_touch_call(&mut self);
    fn record_touch_found(&mut self);
}

/// Metrics for the splay tree.
pub trait SplayMetricsRecorder: CoreMetricsRecorder {
    fn record_splay_call(&mut self);
    fn record_rotation(&mut self);
    fn record_link_step(&mut self);
    fn record_split_insert(&mut self);
}

/// Snapshot metrics for tests and ad-hoc inspection.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
