use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::{RangeLruMetricsSnapshot, SplayMetricsSnapshot};
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// directly or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_counter(&self, name: &str, value: u64) {
        let mut writer = self
            .writer
            .lock()
            .expect("metrics exporter writer poisoned");
        let _ = writeln!(writer, "# TYPE {} counter", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_gauge(&self, name: &str, value: u64) {
        let mut writer = self
            .writer
            .lock()
            .expect("metrics exporter writer poisoned");
        let _ = writeln!(writer, "# TYPE {} gauge", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }

    fn write_core(
        &self,
        get_calls: u64,
        get_hits: u64,
        get_misses: u64,
        insert_calls: u64,
        insert_updates: u64,
        insert_new: u64,
    ) {
        self.write_counter(&self.metric_name("get_calls_total"), get_calls);
        self.write_counter(&self.metric_name("get_hits_total"), get_hits);
        self.write_counter(&self.metric_name("get_misses_total"), get_misses);
        self.write_counter(&self.metric_name("insert_calls_total"), insert_calls);
        self.write_counter(&self.metric_name("insert_updates_total"), insert_updates);
        self.write_counter(&self.metric_name("insert_new_total"), insert_new);
    }
}

impl<W: Write + Send + Sync> MetricsExporter<RangeLruMetricsSnapshot>
    for PrometheusTextExporter<W>
{
    fn export(&self, snapshot: &RangeLruMetricsSnapshot) {
        self.write_core(
            snapshot.get_calls,
            snapshot.get_hits,
            snapshot.get_misses,
            snapshot.insert_calls,
            snapshot.insert_updates,
            snapshot.insert_new,
        );
        self.write_counter(&self.metric_name("evict_calls_total"), snapshot.evict_calls);
        self.write_counter(
            &self.metric_name("evicted_entries_total"),
            snapshot.evicted_entries,
        );
        self.write_counter(
            &self.metric_name("invalidate_calls_total"),
            snapshot.invalidate_calls,
        );
        self.write_counter(
            &self.metric_name("invalidated_entries_total"),
            snapshot.invalidated_entries,
        );
        self.write_counter(
            &self.metric_name("invalidate_scan_steps_total"),
            snapshot.invalidate_scan_steps,
        );
        self.write_counter(&self.metric_name("pop_lru_calls_total"), snapshot.pop_lru_calls);
        self.write_counter(&self.metric_name("touch_calls_total"), snapshot.touch_calls);
        self.write_counter(&self.metric_name("peek_calls_total"), snapshot.peek_calls);
        self.write_gauge(&self.metric_name("cache_len"), snapshot.cache_len as u64);
        self.write_gauge(&self.metric_name("capacity"), snapshot.capacity as u64);
    }
}

impl<W: Write + Send + Sync> MetricsExporter<SplayMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &SplayMetricsSnapshot) {
        self.write_core(
            snapshot.get_calls,
            snapshot.get_hits,
            snapshot.get_misses,
            snapshot.insert_calls,
            snapshot.insert_updates,
            snapshot.insert_new,
        );
        self.write_counter(&self.metric_name("splay_calls_total"), snapshot.splay_calls);
        self.write_counter(&self.metric_name("rotations_total"), snapshot.rotations);
        self.write_counter(&self.metric_name("link_steps_total"), snapshot.link_steps);
        self.write_counter(
            &self.metric_name("split_inserts_total"),
            snapshot.split_inserts,
        );
        self.write_counter(&self.metric_name("peek_calls_total"), snapshot.peek_calls);
        self.write_gauge(&self.metric_name("cache_len"), snapshot.cache_len as u64);
        self.write_gauge(&self.metric_name("depth"), snapshot.depth as u64);
    }
}
