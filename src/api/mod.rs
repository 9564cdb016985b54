//! HTTP surface for the Atlas gateway

pub mod websocket;

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::config::EngineConfig;
use crate::transcribe::Transcriber;
use crate::vocab::PatternIndex;

/// Demo page served at `/`
const DEMO_PAGE: &str = include_str!("../../static/index.html");

/// Shared state for all handlers
///
/// The pattern index is compiled once at startup and shared read-only with
/// every session; nothing here mutates after construction.
pub struct AppState {
    pub index: Arc<PatternIndex>,
    pub transcriber: Arc<dyn Transcriber>,
    pub engine: EngineConfig,
}

/// Build the gateway router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(demo_page))
        .route("/health", get(health))
        .with_state(Arc::clone(&state))
        .merge(websocket::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
}

/// Bind and serve until the process is stopped
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Serve the embedded demo page
async fn demo_page() -> Html<&'static str> {
    Html(DEMO_PAGE)
}

/// Liveness probe with vocabulary size
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "patterns": state.index.len(),
    }))
}
