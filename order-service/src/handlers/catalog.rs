//! Service catalog (servicos) handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use order_types::{ServiceRequest, ServiceResponse, SuccessResponse};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;
use uuid::Uuid;

use crate::models::CreateCatalogService;
use crate::startup::AppState;

/// GET /api/servicos
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let services = state.db.list_services().await?;
    Ok(Json(services.into_iter().map(ServiceResponse::from).collect()))
}

/// POST /api/servicos
pub async fn create_service(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), AppError> {
    let service = state
        .db
        .create_service(&CreateCatalogService::from(req))
        .await?;
    Ok((StatusCode::CREATED, Json(ServiceResponse::from(service))))
}

/// DELETE /api/servicos/:id
pub async fn delete_service(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_service(service_id).await?;
    Ok(Json(SuccessResponse::ok()))
}
