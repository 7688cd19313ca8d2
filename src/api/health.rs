//! Liveness and readiness probes.
//!
//! Both check that storage answers and that the spatial index agrees with it.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};
use tracing::warn;

use super::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let store = Arc::clone(&state.store);
    match state.blocking(move || store.probe()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "spatial_index": "available",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "unhealthy", "error": e.to_string() })),
            )
        }
    }
}

pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let store = Arc::clone(&state.store);
    match state.blocking(move || store.probe()).await {
        Ok(probe) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "database": "connected",
                "spatial_index": "available",
                "models": "accessible",
                "poi_count": probe.stored,
            })),
        ),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not_ready", "error": e.to_string() })),
            )
        }
    }
}
