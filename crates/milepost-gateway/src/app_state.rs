//! Shared application state for the Milepost gateway.
//!
//! The registry is constructed here, all metrics are registered while it is
//! still exclusively owned, and only then is it shared. Duplicate metric
//! registration therefore fails the boot instead of silently overwriting.

use std::sync::Arc;
use std::time::Duration;

use milepost_core::error::Result;
use milepost_core::Registry;

use crate::config::GatewayConfig;
use crate::limit::FixedWindowLimiter;
use crate::obs::HttpMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    registry: Arc<Registry>,
    http_metrics: HttpMetrics,
    limiter: Option<Arc<FixedWindowLimiter>>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle startup errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let mut registry = Registry::new();
        let http_metrics = HttpMetrics::register(&mut registry)?;

        let limiter = cfg.limit.enabled.then(|| {
            Arc::new(FixedWindowLimiter::new(
                Duration::from_secs(cfg.limit.window_secs),
                cfg.limit.max_requests,
            ))
        });

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry: Arc::new(registry),
                http_metrics,
                limiter,
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn http_metrics(&self) -> HttpMetrics {
        self.inner.http_metrics
    }

    pub fn limiter(&self) -> Option<Arc<FixedWindowLimiter>> {
        self.inner.limiter.clone()
    }
}
