// ============================================================
// Layer 1 — Prediction Service (axum)
// ============================================================
// HTTP front end over one loaded Predictor.
//
//   POST /predict   validate → feature input → rounded demand
//   GET  /health    liveness plus the served model file name
//
// The model is loaded once, before the listener binds, and is
// shared read-only across requests; a load failure stops the
// process before it starts accepting connections.

/// Request and response bodies
pub mod types;

/// Route handlers
pub mod handlers;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::ml::inferencer::Predictor;

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self { predictor: Arc::new(predictor) }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(host: &str, port: u16, state: AppState) -> Result<()> {
    let addr     = format!("{host}:{port}");
    let model    = state.predictor.model_name();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Serving model '{model}' on http://{addr}");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
