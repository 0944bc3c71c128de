//! Handlers for vehicle lookups.
//!
//! The plate may arrive as a path segment (`/api/vehicle/12-345-67`) or as a query
//! parameter (`/api/vehicle?plate=12-345-67`). Both routes feed the raw string into
//! [`lookup_plate`], so normalization and response shaping never depend on the route.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, AppErrorResponse, ResultExt};
use crate::lookup::{LookupResult, VehicleRecord};
use crate::middleware::RequestId;
use crate::plate::PlateQuery;
use crate::state::AppState;

pub const NO_VEHICLE_MESSAGE: &str = "No vehicle found";

/// Query parameters for the query-string variant.
#[derive(Debug, Deserialize)]
pub struct PlateParams {
    pub plate: Option<String>,
}

/// Successful lookup envelope: found or not found.
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub success: bool,
    pub plate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<VehicleRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Normalize a raw plate, query the registry, and shape the result.
///
/// Empty plates are rejected before any outbound call.
pub async fn lookup_plate(state: &AppState, raw: Option<&str>) -> Result<VehicleResponse, AppError> {
    let plate = PlateQuery::parse(raw).ok_or(AppError::InvalidPlate)?;
    tracing::info!(plate = %plate, "Searching for plate");

    match state.vehicles.lookup(&plate).await {
        LookupResult::Found(record) => Ok(VehicleResponse {
            success: true,
            plate: plate.to_string(),
            data: Some(record),
            message: None,
        }),
        LookupResult::NotFound => Ok(VehicleResponse {
            success: false,
            plate: plate.to_string(),
            data: None,
            message: Some(NO_VEHICLE_MESSAGE),
        }),
        LookupResult::UpstreamError(e) => Err(AppError::Upstream(e)),
    }
}

/// Handler for `GET /api/vehicle/{plate_number}`.
///
/// A segment axum cannot decode (e.g. invalid UTF-8) is treated as absent input.
#[instrument(name = "vehicle::by_path", skip(state, request_id, plate_number))]
pub async fn by_path(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    plate_number: Result<Path<String>, PathRejection>,
) -> Result<Json<VehicleResponse>, AppErrorResponse> {
    let raw = match plate_number {
        Ok(Path(raw)) => Some(raw),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable plate segment");
            None
        }
    };

    let response = lookup_plate(&state, raw.as_deref())
        .await
        .with_request_id(&request_id)?;
    Ok(Json(response))
}

/// Handler for `GET /api/vehicle?plate=...`.
///
/// A query string that does not deserialize (e.g. a repeated `plate`) is treated as
/// absent input.
#[instrument(name = "vehicle::by_query", skip(state, request_id, params))]
pub async fn by_query(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<PlateParams>, QueryRejection>,
) -> Result<Json<VehicleResponse>, AppErrorResponse> {
    let raw = match params {
        Ok(Query(params)) => params.plate,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable plate query");
            None
        }
    };

    let response = lookup_plate(&state, raw.as_deref())
        .await
        .with_request_id(&request_id)?;
    Ok(Json(response))
}
