//! Auth API Handlers
//!
//! Login works by PIN alone: the submitted PIN is hashed with the server
//! pepper and looked up directly. A miss answers with a uniform error so
//! the response does not reveal which PINs exist.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, pin_index};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::{AppError, AppResult, validation::validate_pin};
use shared::models::User;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub pin: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/login - PIN login, returns a bearer token
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_pin(&payload.pin).map_err(|_| AppError::invalid_credentials())?;

    let digest = pin_index(&state.config.pin_pepper, &payload.pin);
    let found = user::find_by_pin_index(&state.pool, &digest).await?;
    let Some(found) = found else {
        tracing::warn!(target: "security", "Failed login attempt");
        return Err(AppError::invalid_credentials());
    };

    let token = state
        .jwt_service
        .generate_token(found.id, &found.username, found.is_admin)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(username = %found.username, "User logged in");
    Ok(Json(LoginResponse { token, user: found }))
}

/// GET /api/auth/me - the authenticated user
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let found = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User not found: {}", current_user.id)))?;
    Ok(Json(found))
}

#[derive(Deserialize)]
pub struct ChangePinRequest {
    pub pin: String,
}

/// POST /api/auth/pin - change the caller's own PIN
pub async fn change_pin(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ChangePinRequest>,
) -> AppResult<Json<bool>> {
    validate_pin(&payload.pin)?;
    let digest = pin_index(&state.config.pin_pepper, &payload.pin);
    user::update_pin_index(&state.pool, current_user.id, &digest).await?;
    tracing::info!(username = %current_user.username, "PIN changed");
    Ok(Json(true))
}
