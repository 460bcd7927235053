//! Milepost core: metric definitions, the process-wide registry, and the
//! text exposition renderer shared by the gateway and tooling.
//!
//! This crate intentionally carries no transport or runtime dependencies so
//! the registry can be embedded anywhere (gateway middleware, tests, CLIs).
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `MilepostError`/`Result` so that
//! instrumentation can never crash the process it is observing.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{MilepostError, Result};
pub use metrics::{MetricDefinition, MetricHandle, MetricKind, Registry};
