//! Keep-alive web server.
//!
//! Hosting platforms for this bot expect an HTTP endpoint to poll, so a tiny
//! axum server answers `/` with a bare "OK" and `/health` with a JSON status.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::net::TcpListener;

/// Shared state for the web server.
#[derive(Clone)]
struct WebState {
    started_at: Instant,
}

/// Start the keep-alive server.
pub async fn start_web_server(port: u16) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let state = WebState {
        started_at: Instant::now(),
    };

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    log::info!("Starting keep-alive server on http://{}", addr);
    log::info!("  /        - Plain OK");
    log::info!("  /health  - Health check (JSON)");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> &'static str {
    "OK"
}

async fn health_handler(State(state): State<WebState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.started_at.elapsed().as_secs(),
    }))
}
