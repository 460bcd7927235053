//! Request observability: metric handles and the latency recorder.
//!
//! The recorder wraps every request, measures wall-clock duration, and pushes
//! one histogram observation into the shared registry per completed request.
//! Instrumentation failures are logged and swallowed, never surfaced to the
//! request path.

pub mod latency;
pub mod metrics;

pub use latency::{track_latency, ROUTE_UNMATCHED};
pub use metrics::HttpMetrics;
