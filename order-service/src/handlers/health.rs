use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;
use service_core::observability::render_metrics;

use crate::startup::AppState;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "order-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the database must answer.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.db.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness check failed");
        AppError::ServiceUnavailable
    })?;
    Ok(Json(json!({ "status": "ready" })))
}

/// Prometheus metrics endpoint.
pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        render_metrics(),
    )
}

/// Database time probe used by the browser client.
///
/// GET /api/health
pub async fn api_health(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.now().await {
        Ok(time) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "time": time, "dbConnection": "success" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Database time probe failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "error": "Database unavailable" })),
            )
        }
    }
}
