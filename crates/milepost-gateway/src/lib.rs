//! Milepost gateway library entry.
//!
//! This crate wires the observability core into an axum stack: strict YAML
//! config, shared app state, the request-latency recorder, the fixed-window
//! rate limiter, and the scrape/health routes. It is intended to be consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod limit;
pub mod obs;
pub mod router;
