//! Top-level facade crate for Milepost.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use milepost_core::*;
}

pub mod gateway {
    pub use milepost_gateway::*;
}
