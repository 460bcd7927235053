//! Shared error type across Milepost crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, MilepostError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum MilepostError {
    /// A metric with this name is already registered. Fatal at startup:
    /// callers propagate it instead of silently overwriting the first
    /// registration.
    #[error("duplicate metric: {0}")]
    DuplicateMetric(String),
    /// An observation supplied label keys that do not match the metric's
    /// declared label set. Logged and dropped by recorders, never surfaced
    /// to the request path.
    #[error("unknown labels for metric {metric}: got [{got}]")]
    UnknownLabels { metric: String, got: String },
    /// An operation was invoked on a handle of the wrong metric kind
    /// (e.g. `observe` on a counter).
    #[error("metric {metric} is not a {expected}")]
    KindMismatch {
        metric: String,
        expected: &'static str,
    },
    /// Per-identity request quota exhausted. Expected condition, surfaced
    /// as a structured 429 response rather than a generic error.
    #[error("rate limited")]
    RateLimited,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}
