//! Milepost gateway binary.
//!
//! - Strict YAML config (`milepost.yaml`)
//! - Fixed-window rate limiting ahead of all routes
//! - Per-request latency histogram keyed by route template
//! - `GET /metrics` scrape endpoint

use std::net::SocketAddr;

use axum::Router;
use tracing_subscriber::{fmt, EnvFilter};

use milepost_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("milepost.yaml").expect("config load failed");
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .expect("gateway.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("app state init failed");
    let app = router::build_router(state, Router::new());

    tracing::info!(%listen, "milepost-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    // Connect-info gives the limiter real peer addresses.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server failed");
}
