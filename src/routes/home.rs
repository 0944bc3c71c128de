//! Root descriptor, so a bare `GET /` confirms which service answered.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        status: "ok",
        message: "Vehicle lookup relay is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}
