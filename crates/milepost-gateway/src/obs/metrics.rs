//! Metric handles used by the gateway, registered once at startup.

use milepost_core::error::Result;
use milepost_core::{MetricDefinition, MetricHandle, Registry};

/// Handles for the gateway's own metrics. Copyable; the handles stay valid
/// for the registry they were registered against.
#[derive(Clone, Copy)]
pub struct HttpMetrics {
    /// Histogram of request wall-clock duration in seconds, labeled by
    /// method, route template, and final status code.
    pub request_duration: MetricHandle,
    /// Requests rejected by the fixed-window limiter.
    pub rate_limited: MetricHandle,
}

impl HttpMetrics {
    pub fn register(registry: &mut Registry) -> Result<Self> {
        let request_duration = registry.register(MetricDefinition::histogram(
            "http_request_duration_seconds",
            "HTTP request wall-clock duration in seconds.",
            &["method", "route", "status_code"],
        ))?;
        let rate_limited = registry.register(MetricDefinition::counter(
            "milepost_rate_limited_total",
            "Requests rejected by the fixed-window rate limiter.",
            &[],
        ))?;
        Ok(Self {
            request_duration,
            rate_limited,
        })
    }
}
