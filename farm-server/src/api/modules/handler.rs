//! Module catalog API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::access;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::module;
use crate::utils::AppResult;
use shared::models::Module;

/// GET /api/modules - modules visible to the current user, label order
pub async fn visible(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Module>>> {
    let modules =
        access::visible_modules(&state.pool, current_user.id, current_user.is_admin).await?;
    Ok(Json(modules))
}

/// GET /api/modules/all - the full catalog, admin only
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<Module>>> {
    let modules = module::list_all(&state.pool).await?;
    Ok(Json(modules))
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// PUT /api/modules/:id/active - enable or disable a module, admin only
pub async fn set_active(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SetActiveRequest>,
) -> AppResult<Json<Module>> {
    let updated = module::set_active(&state.pool, id, payload.active).await?;
    Ok(Json(updated))
}
