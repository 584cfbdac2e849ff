//! Riding lesson API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::riding;
use crate::utils::{AppResult, validation};
use shared::models::{RidingLesson, RidingLessonCreate};

/// GET /api/horses/lessons - the lesson plan, earliest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<RidingLesson>>> {
    let lessons = riding::list_all(&state.pool).await?;
    Ok(Json(lessons))
}

/// POST /api/horses/lessons - plan a lesson
pub async fn schedule(
    State(state): State<ServerState>,
    Json(payload): Json<RidingLessonCreate>,
) -> AppResult<Json<RidingLesson>> {
    validation::validate_required_text(&payload.lesson_type, "lesson_type", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(&payload.horse, "horse", validation::MAX_NAME_LEN)?;
    validation::validate_positive_quantity(payload.duration_minutes, "duration_minutes")?;

    let lesson = riding::schedule(&state.pool, &payload).await?;
    Ok(Json(lesson))
}

/// DELETE /api/horses/lessons/:id - remove a planned lesson
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    riding::delete(&state.pool, id).await?;
    Ok(Json(true))
}
