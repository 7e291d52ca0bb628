//! Client (cliente) handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use order_types::{ClientRequest, ClientResponse, SuccessResponse};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;
use uuid::Uuid;

use crate::models::WriteClient;
use crate::services::metrics::record_client_delete_refused;
use crate::startup::AppState;

/// GET /api/clientes
pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<ClientResponse>>, AppError> {
    let clients = state.db.list_clients().await?;
    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

/// POST /api/clientes
pub async fn create_client(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), AppError> {
    let client = state.db.create_client(&WriteClient::from(req)).await?;
    Ok((StatusCode::CREATED, Json(ClientResponse::from(client))))
}

/// PUT /api/clientes/:id
pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ClientRequest>,
) -> Result<Json<ClientResponse>, AppError> {
    let client = state
        .db
        .update_client(client_id, &WriteClient::from(req))
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

    Ok(Json(ClientResponse::from(client)))
}

/// Delete a client, refused while any order references it.
///
/// DELETE /api/clientes/:id
pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_client(client_id).await.inspect_err(|e| {
        if matches!(e, AppError::Conflict(_)) {
            record_client_delete_refused();
        }
    })?;
    Ok(Json(SuccessResponse::ok()))
}
