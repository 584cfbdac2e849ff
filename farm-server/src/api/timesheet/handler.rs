//! Timesheet API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::timesheet;
use crate::utils::AppResult;
use shared::models::{TimeEntry, TimeSummary};
use shared::util::now_millis;

/// POST /api/timesheet/clock-in
pub async fn clock_in(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<TimeEntry>> {
    let entry = timesheet::clock_in(&state.pool, current_user.id, now_millis()).await?;
    tracing::info!(username = %current_user.username, "Clocked in");
    Ok(Json(entry))
}

/// POST /api/timesheet/clock-out
pub async fn clock_out(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<TimeEntry>> {
    let entry = timesheet::clock_out(&state.pool, current_user.id, now_millis()).await?;
    tracing::info!(username = %current_user.username, "Clocked out");
    Ok(Json(entry))
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub clocked_in: bool,
    pub open_entry: Option<TimeEntry>,
    pub recent: Vec<TimeEntry>,
}

/// GET /api/timesheet/status - the caller's open span and recent entries
pub async fn status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<StatusResponse>> {
    let open_entry = timesheet::open_entry(&state.pool, current_user.id).await?;
    let recent = timesheet::entries_for_user(&state.pool, current_user.id, 20).await?;
    Ok(Json(StatusResponse {
        clocked_in: open_entry.is_some(),
        open_entry,
        recent,
    }))
}

#[derive(Deserialize)]
pub struct SummaryQuery {
    /// Only count spans clocked in at or after this timestamp (millis)
    pub since: Option<i64>,
}

/// GET /api/timesheet/summary - worked hours per user, admin only
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<Vec<TimeSummary>>> {
    let summary = timesheet::summary(&state.pool, query.since).await?;
    Ok(Json(summary))
}
