//! Quota gate middleware and the fixed 429 rejection shape.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header::HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::app_state::AppState;
use crate::limit::window::Decision;

pub const REJECTION_MESSAGE: &str = "Too many requests. Please try again later.";

// Draft standardized headers; legacy X-RateLimit-* are intentionally absent.
const LIMIT_HEADER: HeaderName = HeaderName::from_static("ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RESET_HEADER: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Gate a request against the per-identity quota.
///
/// Allowed requests are forwarded with the quota headers stamped onto the
/// response. Rejected requests never reach the inner handler; they get the
/// fixed JSON body and a 429, and are counted in the rejection metric.
pub async fn enforce_quota(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(limiter) = state.limiter() else {
        return next.run(req).await;
    };

    let identity = client_identity(&req);
    match limiter.check(&identity) {
        Decision::Allowed {
            limit,
            remaining,
            reset_secs,
        } => {
            let mut res = next.run(req).await;
            stamp_quota_headers(&mut res, limit, remaining, reset_secs);
            res
        }
        Decision::Rejected { limit, reset_secs } => {
            if let Err(e) = state.registry().inc(state.http_metrics().rate_limited, &[]) {
                tracing::warn!(error = %e, "failed to count rate-limited request");
            }
            tracing::debug!(%identity, "request rejected by quota");

            let mut res = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "success": false,
                    "message": REJECTION_MESSAGE,
                })),
            )
                .into_response();
            stamp_quota_headers(&mut res, limit, 0, reset_secs);
            res
        }
    }
}

/// Client identity for quota purposes: the peer IP when the server was built
/// with connect-info, a single shared bucket otherwise. Trusting forwarded
/// headers behind a proxy is a deployment concern, not handled here.
fn client_identity(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn stamp_quota_headers(res: &mut Response, limit: u32, remaining: u32, reset_secs: u64) {
    let headers = res.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&limit.to_string()) {
        headers.insert(LIMIT_HEADER, v);
    }
    if let Ok(v) = HeaderValue::from_str(&remaining.to_string()) {
        headers.insert(REMAINING_HEADER, v);
    }
    if let Ok(v) = HeaderValue::from_str(&reset_secs.to_string()) {
        headers.insert(RESET_HEADER, v);
    }
}
