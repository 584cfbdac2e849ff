//! Task API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::task;
use crate::utils::{AppResult, validation};
use shared::models::{Task, TaskCreate, TaskUpdate};

/// GET /api/tasks - all tasks, open first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Task>>> {
    let tasks = task::list_all(&state.pool).await?;
    Ok(Json(tasks))
}

/// GET /api/tasks/mine - open tasks for the current user (plus unassigned)
pub async fn mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = task::list_open_for_user(&state.pool, current_user.id).await?;
    Ok(Json(tasks))
}

/// POST /api/tasks - create a task
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TaskCreate>,
) -> AppResult<Json<Task>> {
    validation::validate_required_text(&payload.title, "title", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(
        &payload.description,
        "description",
        validation::MAX_NOTE_LEN,
    )?;
    let created = task::create(&state.pool, &payload).await?;
    Ok(Json(created))
}

/// PUT /api/tasks/:id - update a task
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TaskUpdate>,
) -> AppResult<Json<Task>> {
    let updated = task::update(&state.pool, id, &payload).await?;
    Ok(Json(updated))
}

/// POST /api/tasks/:id/complete - mark done, respawning recurring tasks
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Task>> {
    let done = task::complete(&state.pool, id).await?;
    Ok(Json(done))
}

/// DELETE /api/tasks/:id
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    task::delete(&state.pool, id).await?;
    Ok(Json(true))
}
