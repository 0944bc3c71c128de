//! Health check endpoint for container orchestration.
//!
//! A liveness probe only: it never touches the upstream registry, so a registry
//! outage does not get the relay restarted.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
