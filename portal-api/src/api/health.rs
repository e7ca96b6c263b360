//! Liveness endpoint for deployment probes

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
///
/// Reports the running service and its version. Always unauthenticated;
/// answers even when the portal is degraded to CSV-only operation, since
/// a reachable process is still serving requests.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "portal-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
