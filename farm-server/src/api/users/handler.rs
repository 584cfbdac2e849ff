//! User administration API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::{CurrentUser, pin_index};
use crate::core::ServerState;
use crate::db::repository::{module, user};
use crate::utils::{AppError, AppResult, validation};
use shared::models::{User, UserCreate, UserModulesUpdate, UserWithModules};

/// GET /api/users - all users with their module memberships
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserWithModules>>> {
    let users = user::list_with_modules(&state.pool).await?;
    Ok(Json(users))
}

/// POST /api/users - create a user
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    validation::validate_required_text(&payload.username, "username", validation::MAX_NAME_LEN)?;
    validation::validate_pin(&payload.pin)?;

    let digest = pin_index(&state.config.pin_pepper, &payload.pin);
    let created = user::create(
        &state.pool,
        payload.username.trim(),
        &digest,
        payload.is_admin,
    )
    .await?;

    // A new admin starts with the full catalog
    if created.is_admin {
        user::grant_all_modules(&state.pool, created.id).await?;
    }

    tracing::info!(username = %created.username, is_admin = created.is_admin, "User created");
    Ok(Json(created))
}

/// DELETE /api/users/:id - remove a user (not yourself)
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if id == current_user.id {
        return Err(AppError::validation("cannot delete your own account"));
    }
    user::delete(&state.pool, id).await?;
    Ok(Json(true))
}

/// PUT /api/users/:id/modules - replace a user's module memberships
pub async fn set_modules(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserModulesUpdate>,
) -> AppResult<Json<Vec<i64>>> {
    for module_id in &payload.module_ids {
        if module::find_by_id(&state.pool, *module_id).await?.is_none() {
            return Err(AppError::not_found(format!("Module not found: {module_id}")));
        }
    }
    user::set_modules(&state.pool, id, &payload.module_ids).await?;
    let ids = user::module_ids_for_user(&state.pool, id).await?;
    Ok(Json(ids))
}
