//! Per-identity fixed-window counters.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Outcome of a quota check. Both arms carry what the response headers need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed {
        limit: u32,
        remaining: u32,
        reset_secs: u64,
    },
    Rejected {
        limit: u32,
        reset_secs: u64,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }
}

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter per client identity.
///
/// A window is created lazily on the first request from an identity and
/// reset lazily once the configured duration has elapsed. Each check mutates
/// the identity's window under its map shard lock, so concurrent requests
/// from one identity never lose counts.
pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u32,
    windows: DashMap<String, Window>,
}

impl FixedWindowLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            windows: DashMap::new(),
        }
    }

    /// Count a request against `identity`'s current window and decide.
    pub fn check(&self, identity: &str) -> Decision {
        self.check_at(identity, Instant::now())
    }

    fn check_at(&self, identity: &str, now: Instant) -> Decision {
        let mut w = self
            .windows
            .entry(identity.to_string())
            .or_insert_with(|| Window {
                started: now,
                count: 0,
            });

        if now.duration_since(w.started) >= self.window {
            w.started = now;
            w.count = 0;
        }
        w.count = w.count.saturating_add(1);

        let left = self.window.saturating_sub(now.duration_since(w.started));
        let reset_secs = left.as_secs_f64().ceil() as u64;

        if w.count > self.max_requests {
            Decision::Rejected {
                limit: self.max_requests,
                reset_secs,
            }
        } else {
            Decision::Allowed {
                limit: self.max_requests,
                remaining: self.max_requests - w.count,
                reset_secs,
            }
        }
    }

    /// Number of identities currently tracked. Test/monitoring helper.
    pub fn tracked_identities(&self) -> usize {
        self.windows.len()
    }
}
