//! Fixed-window rate limiting keyed by client identity.
//!
//! State is held in process memory (single-process deployment); a shared
//! external store would be required to enforce one quota across replicas.

pub mod middleware;
pub mod window;

pub use middleware::enforce_quota;
pub use window::{Decision, FixedWindowLimiter};
