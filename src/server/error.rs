//! API error responses for the HTTP front-end.

use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;

/// Errors surfaced to HTTP clients as `{"error": "..."}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body carried no usable URL.
    #[error("No URL provided")]
    MissingUrl,
    /// A run is already active; starts are rejected, not queued.
    #[error("Already running")]
    AlreadyRunning,
    /// The page could not be fetched or parsed.
    #[error("{0}")]
    Fetch(String),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::AlreadyRunning => StatusCode::BAD_REQUEST,
            ApiError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
