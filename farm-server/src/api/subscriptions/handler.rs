//! Subscription API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::subscription;
use crate::subscriptions::{self, BookingSummary};
use crate::utils::AppResult;
use shared::models::{
    ExceptionAction, Subscription, SubscriptionCreate, SubscriptionException, SubscriptionUpdate,
};

/// GET /api/subscriptions - all subscriptions, name order
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Subscription>>> {
    let subs = subscription::list_all(&state.pool).await?;
    Ok(Json(subs))
}

/// POST /api/subscriptions - create a subscription
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SubscriptionCreate>,
) -> AppResult<Json<Subscription>> {
    let sub = subscription::create(&state.pool, &payload).await?;
    Ok(Json(sub))
}

/// PUT /api/subscriptions/:id - update a subscription
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SubscriptionUpdate>,
) -> AppResult<Json<Subscription>> {
    let sub = subscription::update(&state.pool, id, &payload).await?;
    Ok(Json(sub))
}

/// DELETE /api/subscriptions/:id
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    subscription::delete(&state.pool, id).await?;
    Ok(Json(true))
}

/// GET /api/subscriptions/due-today - active subscriptions due today
pub async fn due_today(State(state): State<ServerState>) -> AppResult<Json<Vec<Subscription>>> {
    let subs = subscription::due_on(&state.pool, Local::now().date_naive()).await?;
    Ok(Json(subs))
}

#[derive(Deserialize)]
pub struct BookTodayRequest {
    /// Subscription ID → optional quantity override. A null value books
    /// the subscription's default quantity.
    pub selections: HashMap<i64, Option<i64>>,
}

/// POST /api/subscriptions/book-today - book the selected pickups
pub async fn book_today(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<BookTodayRequest>,
) -> AppResult<Json<BookingSummary>> {
    let now = Local::now();
    let summary = subscriptions::book_today(
        &state.pool,
        &payload.selections,
        now.date_naive(),
        Some(&now.format("%H:%M").to_string()),
        Some(&current_user.username),
    )
    .await?;

    if summary.count == 0 {
        tracing::info!("Booking pass finished with nothing to book");
    } else {
        tracing::info!(count = summary.count, total = summary.total, "Booked subscriptions");
    }
    Ok(Json(summary))
}

#[derive(Deserialize)]
pub struct ExceptionRequest {
    pub original_date: NaiveDate,
    pub action: ExceptionAction,
    pub new_date: Option<NaiveDate>,
}

/// POST /api/subscriptions/:id/exceptions - record a schedule exception
pub async fn add_exception(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ExceptionRequest>,
) -> AppResult<Json<SubscriptionException>> {
    let exception = subscription::add_exception(
        &state.pool,
        id,
        payload.original_date,
        payload.action,
        payload.new_date,
    )
    .await?;
    Ok(Json(exception))
}

/// GET /api/subscriptions/:id/exceptions
pub async fn list_exceptions(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<SubscriptionException>>> {
    let exceptions = subscription::exceptions_for(&state.pool, id).await?;
    Ok(Json(exceptions))
}
