//! Key-value settings handlers.

use axum::{extract::State, Json};
use order_types::{SettingsPayload, SuccessResponse};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

use crate::startup::AppState;

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsPayload>, AppError> {
    let settings = state.db.list_settings().await?;
    Ok(Json(settings.into_iter().collect()))
}

/// Upsert every pair, one statement per key.
///
/// A failure part-way leaves the keys written so far in place.
///
/// POST /api/settings
pub async fn save_settings(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SettingsPayload>,
) -> Result<Json<SuccessResponse>, AppError> {
    for (key, value) in &payload.0 {
        state.db.upsert_setting(key, value).await?;
    }
    tracing::info!(keys = payload.0.len(), "Settings saved");
    Ok(Json(SuccessResponse::ok()))
}
