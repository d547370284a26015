//! Main HTTP Gateway Server.
//!
//! Routing, shared state, and the middleware stack (CORS, tracing, body limit,
//! panic containment).

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument};

use captionforge_core::{CaptionOutcome, CompletionClient};

use crate::caption_api;
use crate::health_api;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub client: Arc<dyn CompletionClient>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            started_at: Instant::now(),
        }
    }
}

/// Build the router with every route and layer.
pub fn build_router(state: GatewayState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/generate-caption/", post(caption_api::generate_caption))
        .route("/generate-caption", post(caption_api::generate_caption))
        .route("/api/health", get(health_api::get_health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// A panic inside a handler still answers with an `error` body.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(%detail, "Handler panicked");
    (
        StatusCode::OK,
        Json(CaptionOutcome::error(format!("internal error: {detail}"))),
    )
        .into_response()
}

/// Starts the Axum HTTP server and serves until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: &str, state: GatewayState, max_upload_bytes: usize) -> Result<()> {
    let app = build_router(state, max_upload_bytes);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);
    info!("  POST /generate-caption/");
    info!("  GET  /api/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
