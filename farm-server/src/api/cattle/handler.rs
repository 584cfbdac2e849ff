//! Cattle API Handlers
//!
//! Herd register: intake, master-data edits, exits, and the per-animal
//! history of vaccinations, medications and inseminations.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::cattle;
use crate::utils::{AppError, AppResult, validation};
use shared::models::{Cattle, CattleCreate, CattleEvent, CattleEventCreate, CattleUpdate, HerdBookEntry};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// GET /api/cattle - the herd table, name order
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Cattle>>> {
    let herd = cattle::list_all(&state.pool).await?;
    Ok(Json(herd))
}

/// GET /api/cattle/book - every animal with its full history
pub async fn herd_book(State(state): State<ServerState>) -> AppResult<Json<Vec<HerdBookEntry>>> {
    let book = cattle::herd_book(&state.pool).await?;
    Ok(Json(book))
}

/// POST /api/cattle - herd intake
pub async fn intake(
    State(state): State<ServerState>,
    Json(payload): Json<CattleCreate>,
) -> AppResult<Json<Cattle>> {
    validation::validate_required_text(&payload.name, "name", validation::MAX_NAME_LEN)?;
    validation::validate_required_text(&payload.ear_tag, "ear_tag", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(&payload.breed, "breed", validation::MAX_NAME_LEN)?;

    let animal = cattle::create(&state.pool, &payload).await?;
    tracing::info!(name = %animal.name, ear_tag = %animal.ear_tag, "Animal registered");
    Ok(Json(animal))
}

/// GET /api/cattle/:id - one animal with its history
pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<HerdBookEntry>> {
    let animal = cattle::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Animal not found: {id}")))?;
    let events = cattle::events_for(&state.pool, id).await?;
    Ok(Json(HerdBookEntry {
        cattle: animal,
        events,
    }))
}

/// PUT /api/cattle/:id - update master data
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CattleUpdate>,
) -> AppResult<Json<Cattle>> {
    validation::validate_optional_text(&payload.name, "name", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(&payload.ear_tag, "ear_tag", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(&payload.breed, "breed", validation::MAX_NAME_LEN)?;

    let animal = cattle::update(&state.pool, id, &payload).await?;
    Ok(Json(animal))
}

/// DELETE /api/cattle/:id - herd exit
pub async fn exit(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    cattle::delete(&state.pool, id).await?;
    Ok(Json(true))
}

#[derive(Deserialize)]
pub struct EventRequest {
    #[serde(flatten)]
    pub event: CattleEventCreate,
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

/// POST /api/cattle/:id/events - record a history entry
pub async fn add_event(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EventRequest>,
) -> AppResult<Json<CattleEvent>> {
    validation::validate_optional_text(&payload.event.label, "label", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(&payload.event.dose, "dose", validation::MAX_NAME_LEN)?;

    let event = cattle::add_event(
        &state.pool,
        id,
        payload.date.unwrap_or_else(today),
        payload.event.kind,
        payload.event.label.as_deref(),
        payload.event.dose.as_deref(),
    )
    .await?;
    Ok(Json(event))
}

/// GET /api/cattle/:id/events - the animal's history, newest first
pub async fn list_events(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<CattleEvent>>> {
    if cattle::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found(format!("Animal not found: {id}")));
    }
    let events = cattle::events_for(&state.pool, id).await?;
    Ok(Json(events))
}

/// DELETE /api/cattle/:id/events/:event_id
pub async fn delete_event(
    State(state): State<ServerState>,
    Path((id, event_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    cattle::delete_event(&state.pool, id, event_id).await?;
    Ok(Json(true))
}
