//! Process-wide metrics: definitions, registry, and text exposition.
//!
//! The registry is explicitly constructed (no ambient global default) and
//! threaded to every recorder, so tests and embedders never share state by
//! accident. Metric names are registered once at process start; recording is
//! lock-free (`DashMap` + atomics), and `snapshot()` renders the Prometheus
//! text exposition format deterministically in declaration order.

pub mod registry;

pub use registry::{Registry, DEFAULT_BUCKETS};

/// The supported metric kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Histogram,
    Gauge,
}

impl MetricKind {
    /// Name used in the `# TYPE` exposition line.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Immutable description of a metric, fixed at registration time.
#[derive(Debug, Clone)]
pub struct MetricDefinition {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    /// Declared label names, in exposition order.
    pub label_names: Vec<String>,
}

impl MetricDefinition {
    pub fn counter(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, help, MetricKind::Counter, label_names)
    }

    pub fn histogram(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, help, MetricKind::Histogram, label_names)
    }

    pub fn gauge(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, help, MetricKind::Gauge, label_names)
    }

    fn new(name: &str, help: &str, kind: MetricKind, label_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind,
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Cheap copyable handle returned by [`Registry::register`]. Valid only for
/// the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricHandle(pub(crate) usize);
