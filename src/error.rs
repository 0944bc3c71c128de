//! Application errors and their JSON renderings.
//!
//! Every failure leaves the relay as `{success: false, message, error?}`. Handlers
//! wrap errors in [`AppErrorResponse`] via [`ResultExt::with_request_id`] so the log
//! line for a failed request carries the same ID as the request span.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::lookup::LookupError;
use crate::middleware::RequestId;

pub const INVALID_PLATE_MESSAGE: &str = "Invalid plate number";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to reach the vehicle registry";
pub const NOT_FOUND_MESSAGE: &str = "Not found";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", INVALID_PLATE_MESSAGE)]
    InvalidPlate,

    #[error("Upstream lookup failed: {0}")]
    Upstream(#[from] LookupError),

    #[error("Route not found")]
    RouteNotFound,
}

/// Body shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidPlate => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let (message, error) = match self {
            AppError::InvalidPlate => (INVALID_PLATE_MESSAGE.to_string(), None),
            AppError::Upstream(e @ LookupError::Api) => (e.to_string(), None),
            AppError::Upstream(LookupError::Transport(detail)) => {
                (TRANSPORT_FAILURE_MESSAGE.to_string(), Some(detail.clone()))
            }
            AppError::RouteNotFound => (NOT_FOUND_MESSAGE.to_string(), None),
        };

        ErrorBody {
            success: false,
            message,
            error,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// An error paired with the ID of the request that produced it.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub request_id: Option<RequestId>,
}

impl From<AppError> for AppErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        let request_id = self
            .request_id
            .as_ref()
            .map(|id| id.0.to_string())
            .unwrap_or_default();

        if self.error.status().is_server_error() {
            tracing::error!(request_id = %request_id, error = %self.error, "Request failed");
        } else {
            tracing::debug!(request_id = %request_id, error = %self.error, "Request rejected");
        }

        self.error.into_response()
    }
}

/// Attach a request ID to the error side of a `Result`.
pub trait ResultExt<T> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|e| AppErrorResponse {
            error: e.into(),
            request_id: Some(request_id.clone()),
        })
    }
}
