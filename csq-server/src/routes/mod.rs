//! HTTP route handlers

pub mod health;
pub mod moves;
pub mod params;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use csq_core::CoreError;
use serde_json::json;

/// Handler failure, rendered as `{"error": ..}`
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or inconsistent request
    BadRequest(String),
    /// The strategy could not produce an answer
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
