//! Livestock API Handlers
//!
//! Per-site overview cards plus event recording. A loss event reduces the
//! derived headcount; quick production books eggs straight onto the
//! ledger with the site attached.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{ledger, livestock, site};
use crate::utils::{AppError, AppResult, validation};
use shared::models::{
    FarmSite, LedgerEntry, LivestockEvent, LivestockEventCreate, LivestockEventKind, SiteOverview,
};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn overview_for(state: &ServerState, site: FarmSite) -> AppResult<SiteOverview> {
    let pool = &state.pool;
    let losses = livestock::loss_total(pool, site.id, None).await?;
    let headcount = site.hens_start + site.hens_adjust - losses;

    let week_start = today() - Duration::days(6);
    let eggs_last7 = ledger::production_for_site_since(pool, site.id, &site.name, week_start).await?;

    let lay_rate = if headcount > 0 {
        Some((eggs_last7 as f64 / (headcount as f64 * 7.0) * 10_000.0).round() / 100.0)
    } else {
        None
    };

    Ok(SiteOverview {
        last_feeding: livestock::last_event_date(pool, site.id, LivestockEventKind::Feeding).await?,
        last_watering: livestock::last_event_date(pool, site.id, LivestockEventKind::Watering)
            .await?,
        last_cleaning: livestock::last_event_date(pool, site.id, LivestockEventKind::Cleaning)
            .await?,
        last_relocation: livestock::last_event_date(pool, site.id, LivestockEventKind::Relocation)
            .await?,
        site,
        headcount,
        eggs_last7,
        lay_rate,
    })
}

/// GET /api/livestock/overview - one card per active site
pub async fn overview(State(state): State<ServerState>) -> AppResult<Json<Vec<SiteOverview>>> {
    let sites = site::list_active(&state.pool).await?;
    let mut cards = Vec::with_capacity(sites.len());
    for s in sites {
        cards.push(overview_for(&state, s).await?);
    }
    Ok(Json(cards))
}

#[derive(Deserialize)]
pub struct EventRequest {
    #[serde(flatten)]
    pub event: LivestockEventCreate,
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

/// POST /api/livestock/sites/:id/events - record an event for a site
pub async fn record_event(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EventRequest>,
) -> AppResult<Json<LivestockEvent>> {
    validation::validate_optional_text(&payload.event.note, "note", validation::MAX_NOTE_LEN)?;

    let event = livestock::record_event(
        &state.pool,
        id,
        payload.date.unwrap_or_else(today),
        payload.event.kind,
        payload.event.quantity,
        payload.event.note.as_deref(),
    )
    .await?;
    Ok(Json(event))
}

/// GET /api/livestock/sites/:id/events - latest events for a site
pub async fn list_events(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<LivestockEvent>>> {
    if site::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found(format!("Site not found: {id}")));
    }
    let events = livestock::list_for_site(&state.pool, id, 50).await?;
    Ok(Json(events))
}

#[derive(Deserialize)]
pub struct QuickProductionRequest {
    pub quantity: i64,
    pub date: Option<NaiveDate>,
}

/// POST /api/livestock/sites/:id/production - book production for a site
///
/// Writes a ledger entry with the site's foreign key and a
/// "Production <site>" label.
pub async fn quick_production(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<QuickProductionRequest>,
) -> AppResult<Json<LedgerEntry>> {
    validation::validate_positive_quantity(payload.quantity, "quantity")?;

    let found = site::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Site not found: {id}")))?;

    let label = format!("Production {}", found.name);
    let entry = ledger::record_production(
        &state.pool,
        payload.quantity,
        Some(&current_user.username),
        Some(&label),
        Some(found.id),
        payload.date.unwrap_or_else(today),
        Some(&Local::now().format("%H:%M").to_string()),
    )
    .await?;
    Ok(Json(entry))
}
