//! Health endpoint

use axum::Json;
use csq_core::wire::HealthResponse;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
