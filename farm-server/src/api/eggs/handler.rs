//! Egg ledger API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::ledger;
use crate::utils::{AppResult, validation};
use shared::models::{DayTotals, DisposalReason, LedgerEntry, PeriodTotals};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn now_hhmm() -> String {
    Local::now().format("%H:%M").to_string()
}

#[derive(Serialize)]
pub struct OverviewResponse {
    pub balance: i64,
    pub today: PeriodTotals,
    pub last7: PeriodTotals,
    pub series: Vec<DayTotals>,
    pub recent: Vec<LedgerEntry>,
}

/// GET /api/eggs/overview - balance, today's and trailing-week totals,
/// a two-week daily series and the latest entries
pub async fn overview(State(state): State<ServerState>) -> AppResult<Json<OverviewResponse>> {
    let today = today();
    let week_start = today - Duration::days(6);

    let balance = ledger::balance(&state.pool).await?;
    let today_totals = ledger::totals_between(&state.pool, today, today).await?;
    let last7 = ledger::totals_between(&state.pool, week_start, today).await?;
    let series = ledger::daily_series(&state.pool, today - Duration::days(13), today).await?;
    let recent = ledger::recent_entries(&state.pool, 25).await?;

    Ok(Json(OverviewResponse {
        balance,
        today: today_totals,
        last7,
        series,
        recent,
    }))
}

#[derive(Deserialize)]
pub struct SeriesQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// GET /api/eggs/series?start=..&end=.. - dense per-day totals
pub async fn series(
    State(state): State<ServerState>,
    Query(query): Query<SeriesQuery>,
) -> AppResult<Json<Vec<DayTotals>>> {
    let series = ledger::daily_series(&state.pool, query.start, query.end).await?;
    Ok(Json(series))
}

#[derive(Deserialize)]
pub struct ProductionRequest {
    pub quantity: i64,
    pub site_id: Option<i64>,
    pub label: Option<String>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    /// Defaults to the current wall-clock time, "HH:MM"
    pub time: Option<String>,
}

/// POST /api/eggs/production - record a production movement
pub async fn record_production(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ProductionRequest>,
) -> AppResult<Json<LedgerEntry>> {
    validation::validate_positive_quantity(payload.quantity, "quantity")?;
    validation::validate_optional_text(&payload.label, "label", validation::MAX_NOTE_LEN)?;

    let date = payload.date.unwrap_or_else(today);
    let time = payload.time.unwrap_or_else(now_hhmm);

    let entry = ledger::record_production(
        &state.pool,
        payload.quantity,
        Some(&current_user.username),
        payload.label.as_deref(),
        payload.site_id,
        date,
        Some(&time),
    )
    .await?;
    Ok(Json(entry))
}

#[derive(Deserialize)]
pub struct DisposalRequest {
    pub quantity: i64,
    pub reason: Option<DisposalReason>,
    pub label: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

/// POST /api/eggs/disposal - record a disposal, guarded by the balance
pub async fn record_disposal(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<DisposalRequest>,
) -> AppResult<Json<LedgerEntry>> {
    validation::validate_positive_quantity(payload.quantity, "quantity")?;
    validation::validate_optional_text(&payload.label, "label", validation::MAX_NOTE_LEN)?;

    let date = payload.date.unwrap_or_else(today);
    let time = payload.time.unwrap_or_else(now_hhmm);
    let label = payload
        .label
        .or_else(|| payload.reason.map(|r| r.label().to_string()));

    let entry = ledger::record_disposal(
        &state.pool,
        payload.quantity,
        Some(&current_user.username),
        label.as_deref(),
        date,
        Some(&time),
    )
    .await?;
    Ok(Json(entry))
}
