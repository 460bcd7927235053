//! Axum router wiring (app routes + scrape/health, instrumented).
//!
//! Layer order matters: the quota gate sits inside the latency recorder so
//! rejected requests are still observed (a 429 is a completed request with a
//! final status).

use axum::extract::State;
use axum::http::header;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};

use crate::app_state::AppState;
use crate::{limit, obs};

/// Content type of the text exposition format.
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Merge the application's routes with `/metrics` + `/healthz` and install
/// the observability middleware around everything, fallback included.
pub fn build_router(state: AppState, app: Router<AppState>) -> Router {
    app.route("/metrics", get(metrics_snapshot))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            limit::enforce_quota,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::track_latency,
        ))
        .with_state(state)
}

/// Scrape endpoint: the registry snapshot in text exposition format.
async fn metrics_snapshot(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        state.registry().snapshot(),
    )
        .into_response()
}

async fn healthz() -> &'static str {
    "ok"
}
