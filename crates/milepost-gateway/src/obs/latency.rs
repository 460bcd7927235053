//! Request-latency recorder middleware.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::app_state::AppState;

/// Route label used when no registered route pattern matched. Arbitrary
/// unmatched paths (typos, probes, bot scans) must collapse into a single
/// label value so registry cardinality stays bounded.
pub const ROUTE_UNMATCHED: &str = "unmatched";

/// Wrap a request and record exactly one duration observation on completion.
///
/// The route label is the matched template (e.g. `/user/:id`), never the raw
/// path. The observation happens after the inner stack has produced the final
/// response, so the status code is final; if the client aborts mid-flight the
/// future is dropped before the observe call and nothing is recorded.
pub async fn track_latency(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_ascii_uppercase();
    // MatchedPath is only present when the router matched a registered
    // pattern; the fallback (404) path carries no template.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned());

    let res = next.run(req).await;

    let elapsed = start.elapsed().as_secs_f64();
    let status = res.status().as_u16().to_string();
    let route = route.as_deref().unwrap_or(ROUTE_UNMATCHED);
    if let Err(e) = state.registry().observe(
        state.http_metrics().request_duration,
        &[("method", &method), ("route", route), ("status_code", &status)],
        elapsed,
    ) {
        // Observability must never break the request path.
        tracing::warn!(error = %e, route, "failed to record request latency");
    }
    res
}
