//! User account and login handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use order_types::{
    ChangePasswordRequest, CreateUserRequest, LoginRequest, LoginResponse, SuccessResponse,
    UserResponse,
};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

use crate::models::{CreateUser, ADMIN_USERNAME};
use crate::services::metrics::record_login;
use crate::startup::AppState;
use crate::utils::{hash_password, verify_password, Password};

/// Verify credentials.
///
/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state.db.get_user_by_username(&req.username).await?;
    let password = Password::new(req.password);

    match user {
        Some(user) if verify_password(&password, &user.password_hash) => {
            record_login("success");
            tracing::info!(username = %user.username, "Login succeeded");
            Ok(Json(LoginResponse {
                success: true,
                user: UserResponse::from(user),
            }))
        }
        _ => {
            record_login("failure");
            tracing::warn!(username = %req.username, "Login failed");
            Err(AppError::Unauthorized(anyhow::anyhow!(
                "Usuário ou senha inválidos"
            )))
        }
    }
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.db.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let password_hash = hash_password(&Password::new(req.password))?;

    let user = state
        .db
        .create_user(&CreateUser {
            username: req.username,
            password_hash,
            name: req.name,
            role: req.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// DELETE /api/users/:username
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if username == ADMIN_USERNAME {
        return Err(AppError::BadRequest(anyhow::anyhow!("Cannot delete admin")));
    }

    state.db.delete_user(&username).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// PATCH /api/users/:username/password
pub async fn change_password(
    State(state): State<AppState>,
    Path(username): Path<String>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let password_hash = hash_password(&Password::new(req.password))?;

    if !state.db.update_password(&username, &password_hash).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
    }

    tracing::info!(username = %username, "Password changed");
    Ok(Json(SuccessResponse::ok()))
}
