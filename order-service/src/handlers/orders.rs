//! Order (pedido) handlers.
//!
//! Create and replace persist totals and statuses exactly as submitted. The
//! two transitions set their status directly without looking at amounts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use order_types::{OrderRequest, OrderResponse, ReceiptSnapshot, SettingsPayload};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;
use uuid::Uuid;

use crate::models::{Order, WriteOrder};
use crate::services::metrics::{record_order_created, record_order_updated, record_transition};
use crate::services::build_receipt;
use crate::startup::AppState;

fn order_not_found(order_id: Uuid) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Order {} not found", order_id))
}

/// GET /api/pedidos
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state.db.list_orders().await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// GET /api/pedidos/:id
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .db
        .get_order(order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    Ok(Json(OrderResponse::from(order)))
}

/// POST /api/pedidos
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<OrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let order = state.db.create_order(&WriteOrder::from(req)).await?;
    record_order_created(&order.payment_status);
    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// Full-record replacement, last write wins.
///
/// PUT /api/pedidos/:id
pub async fn replace_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<OrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .db
        .replace_order(order_id, &WriteOrder::from(req))
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    record_order_updated();
    Ok(Json(OrderResponse::from(order)))
}

/// PATCH /api/pedidos/:id/withdraw
pub async fn mark_withdrawn(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .db
        .mark_withdrawn(order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    record_transition("withdraw");
    Ok(Json(OrderResponse::from(order)))
}

/// PATCH /api/pedidos/:id/pay
pub async fn mark_paid(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .db
        .mark_paid(order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    record_transition("pay");
    Ok(Json(OrderResponse::from(order)))
}

/// GET /api/pedidos/:id/receipt
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<ReceiptSnapshot>, AppError> {
    let order: Order = state
        .db
        .get_order(order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    let client = state.db.get_client(order.client_id).await?;
    let settings: SettingsPayload = state.db.list_settings().await?.into_iter().collect();

    Ok(Json(build_receipt(order, client, &settings)))
}
