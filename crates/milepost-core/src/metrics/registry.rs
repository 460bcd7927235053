//! The metrics registry: registration, recording, and snapshot rendering.
//!
//! Series are stored per metric in a `DashMap` keyed by label values in
//! declared label-name order. Counters and histogram bucket counts are
//! relaxed atomics; histogram sums and gauge values are `f64` stored as
//! `AtomicU64` bits with a CAS-add loop. Rendering collects and sorts each
//! metric's series so two snapshots of the same state are byte-identical.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::error::{MilepostError, Result};
use crate::metrics::{MetricDefinition, MetricHandle, MetricKind};

/// Histogram bucket upper bounds in seconds (cumulative, `+Inf` implied).
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Helper to escape label values for the text exposition format.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Help text shares the label escaping minus the quote rule.
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Lock-free add for an f64 stored as `AtomicU64` bits.
fn f64_fetch_add(cell: &AtomicU64, v: f64) {
    let mut cur = cell.load(Ordering::Relaxed);
    loop {
        let next = (f64::from_bits(cur) + v).to_bits();
        match cell.compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return,
            Err(actual) => cur = actual,
        }
    }
}

/// Accumulated state for one label-value combination.
///
/// `value_bits` holds the histogram sum or the gauge value as f64 bits;
/// counters use `count` alone and `buckets` stays empty for non-histograms.
struct Series {
    count: AtomicU64,
    value_bits: AtomicU64,
    buckets: Vec<AtomicU64>,
}

impl Series {
    fn new(kind: MetricKind) -> Self {
        let buckets = match kind {
            MetricKind::Histogram => DEFAULT_BUCKETS.iter().map(|_| AtomicU64::new(0)).collect(),
            _ => Vec::new(),
        };
        Self {
            count: AtomicU64::new(0),
            value_bits: AtomicU64::new(0f64.to_bits()),
            buckets,
        }
    }
}

struct MetricEntry {
    def: MetricDefinition,
    series: DashMap<Vec<String>, Series>,
}

/// Process-wide store of metric definitions and their accumulated values.
///
/// Construct once at startup, register every metric while the registry is
/// still exclusively owned, then share it behind an `Arc`. Recording methods
/// take `&self` and tolerate arbitrary interleaving without lost updates.
pub struct Registry {
    entries: Vec<MetricEntry>,
    started: Instant,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Register a metric. Fails with `DuplicateMetric` if the name is taken;
    /// callers are expected to propagate that at startup rather than
    /// overwrite the earlier registration.
    pub fn register(&mut self, def: MetricDefinition) -> Result<MetricHandle> {
        if self.entries.iter().any(|e| e.def.name == def.name) {
            return Err(MilepostError::DuplicateMetric(def.name));
        }
        self.entries.push(MetricEntry {
            def,
            series: DashMap::new(),
        });
        Ok(MetricHandle(self.entries.len() - 1))
    }

    /// Record one histogram observation in seconds.
    pub fn observe(&self, handle: MetricHandle, labels: &[(&str, &str)], seconds: f64) -> Result<()> {
        let entry = self.entry(handle, MetricKind::Histogram)?;
        let key = order_values(&entry.def, labels)?;

        let series = entry
            .series
            .entry(key)
            .or_insert_with(|| Series::new(MetricKind::Histogram));
        series.count.fetch_add(1, Ordering::Relaxed);
        f64_fetch_add(&series.value_bits, seconds);
        for (i, &le) in DEFAULT_BUCKETS.iter().enumerate() {
            if seconds <= le {
                series.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Increment a counter by 1.
    pub fn inc(&self, handle: MetricHandle, labels: &[(&str, &str)]) -> Result<()> {
        self.add(handle, labels, 1)
    }

    /// Increment a counter by an arbitrary value.
    pub fn add(&self, handle: MetricHandle, labels: &[(&str, &str)], v: u64) -> Result<()> {
        let entry = self.entry(handle, MetricKind::Counter)?;
        let key = order_values(&entry.def, labels)?;
        let series = entry
            .series
            .entry(key)
            .or_insert_with(|| Series::new(MetricKind::Counter));
        series.count.fetch_add(v, Ordering::Relaxed);
        Ok(())
    }

    /// Set a gauge to an absolute value.
    pub fn set(&self, handle: MetricHandle, labels: &[(&str, &str)], v: f64) -> Result<()> {
        let entry = self.entry(handle, MetricKind::Gauge)?;
        let key = order_values(&entry.def, labels)?;
        let series = entry
            .series
            .entry(key)
            .or_insert_with(|| Series::new(MetricKind::Gauge));
        series.value_bits.store(v.to_bits(), Ordering::Relaxed);
        Ok(())
    }

    /// Seconds since the registry was constructed.
    pub fn uptime_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Render all metrics in the Prometheus text exposition format.
    ///
    /// Metrics appear in declaration order; within a metric, series are
    /// sorted by label values so output is reproducible. A process uptime
    /// gauge is appended last.
    pub fn snapshot(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            self.render_entry(entry, &mut out);
        }
        let _ = writeln!(
            out,
            "# HELP milepost_process_uptime_seconds Seconds since the registry was created."
        );
        let _ = writeln!(out, "# TYPE milepost_process_uptime_seconds gauge");
        let _ = writeln!(out, "milepost_process_uptime_seconds {}", self.uptime_seconds());
        out
    }

    fn entry(&self, handle: MetricHandle, want: MetricKind) -> Result<&MetricEntry> {
        let entry = self
            .entries
            .get(handle.0)
            .ok_or_else(|| MilepostError::Internal(format!("stale metric handle {}", handle.0)))?;
        if entry.def.kind != want {
            return Err(MilepostError::KindMismatch {
                metric: entry.def.name.clone(),
                expected: want.as_str(),
            });
        }
        Ok(entry)
    }

    fn render_entry(&self, entry: &MetricEntry, out: &mut String) {
        let name = &entry.def.name;
        let _ = writeln!(out, "# HELP {} {}", name, escape_help(&entry.def.help));
        let _ = writeln!(out, "# TYPE {} {}", name, entry.def.kind.as_str());

        // Sort series so snapshots are deterministic.
        let mut keys: Vec<Vec<String>> = entry.series.iter().map(|r| r.key().clone()).collect();
        keys.sort();

        for key in keys {
            let Some(series) = entry.series.get(&key) else { continue };
            let label_str = entry
                .def
                .label_names
                .iter()
                .zip(key.iter())
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");

            match entry.def.kind {
                MetricKind::Counter => {
                    let val = series.count.load(Ordering::Relaxed);
                    if label_str.is_empty() {
                        let _ = writeln!(out, "{} {}", name, val);
                    } else {
                        let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
                    }
                }
                MetricKind::Gauge => {
                    let val = f64::from_bits(series.value_bits.load(Ordering::Relaxed));
                    if label_str.is_empty() {
                        let _ = writeln!(out, "{} {}", name, val);
                    } else {
                        let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
                    }
                }
                MetricKind::Histogram => {
                    let prefix = if label_str.is_empty() {
                        String::new()
                    } else {
                        format!("{},", label_str)
                    };
                    for (i, &le) in DEFAULT_BUCKETS.iter().enumerate() {
                        let c = series.buckets[i].load(Ordering::Relaxed);
                        let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, c);
                    }
                    let count = series.count.load(Ordering::Relaxed);
                    let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);
                    let sum = f64::from_bits(series.value_bits.load(Ordering::Relaxed));
                    let _ = writeln!(out, "{}_sum{{{}}} {}", name, label_str, sum);
                    let _ = writeln!(out, "{}_count{{{}}} {}", name, label_str, count);
                }
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate that `labels` carries exactly the declared label set and return
/// the values reordered into declaration order.
fn order_values(def: &MetricDefinition, labels: &[(&str, &str)]) -> Result<Vec<String>> {
    if labels.len() != def.label_names.len() {
        return Err(unknown_labels(def, labels));
    }
    let mut key = Vec::with_capacity(def.label_names.len());
    for name in &def.label_names {
        match labels.iter().find(|(k, _)| k == name) {
            Some((_, v)) => key.push((*v).to_string()),
            None => return Err(unknown_labels(def, labels)),
        }
    }
    Ok(key)
}

fn unknown_labels(def: &MetricDefinition, labels: &[(&str, &str)]) -> MilepostError {
    MilepostError::UnknownLabels {
        metric: def.name.clone(),
        got: labels
            .iter()
            .map(|(k, _)| *k)
            .collect::<Vec<_>>()
            .join(","),
    }
}
