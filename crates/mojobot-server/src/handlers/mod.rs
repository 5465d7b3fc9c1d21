//! HTTP route handlers for the agent server.

pub mod invocations;

use axum::Json;

use crate::dto::HealthResponse;
use crate::error::AppError;

/// Health check. Always healthy while the process is serving.
pub async fn ping() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
