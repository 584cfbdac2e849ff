//! Farm site API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::site;
use crate::utils::AppResult;
use shared::models::{FarmSite, FarmSiteCreate, FarmSiteUpdate};

#[derive(Deserialize)]
pub struct ListQuery {
    /// When true, retired sites are included
    #[serde(default)]
    pub all: bool,
}

/// GET /api/sites - active sites (all with ?all=true), name order
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<FarmSite>>> {
    let sites = if query.all {
        site::list_all(&state.pool).await?
    } else {
        site::list_active(&state.pool).await?
    };
    Ok(Json(sites))
}

/// POST /api/sites - create a site, admin only
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FarmSiteCreate>,
) -> AppResult<Json<FarmSite>> {
    let created = site::create(&state.pool, &payload).await?;
    Ok(Json(created))
}

/// PUT /api/sites/:id - update a site, admin only
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<FarmSiteUpdate>,
) -> AppResult<Json<FarmSite>> {
    let updated = site::update(&state.pool, id, &payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/sites/:id - admin only
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    site::delete(&state.pool, id).await?;
    Ok(Json(true))
}
