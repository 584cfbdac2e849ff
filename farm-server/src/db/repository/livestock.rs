//! Livestock Event Repository
//!
//! Dated care and loss events per site. Headcount is derived:
//! `hens_start + hens_adjust - sum(loss quantities)`, never stored.

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{LivestockEvent, LivestockEventKind};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, site_id, event_date, kind, quantity, note, created_at";

pub async fn record_event(
    pool: &SqlitePool,
    site_id: i64,
    event_date: NaiveDate,
    kind: LivestockEventKind,
    quantity: Option<i64>,
    note: Option<&str>,
) -> RepoResult<LivestockEvent> {
    if kind == LivestockEventKind::Loss && quantity.unwrap_or(0) <= 0 {
        return Err(RepoError::Validation(
            "a loss event needs a positive quantity".into(),
        ));
    }
    // Quantity is only meaningful for losses; drop it elsewhere
    let quantity = if kind == LivestockEventKind::Loss {
        quantity
    } else {
        None
    };

    if crate::db::repository::site::find_by_id(pool, site_id)
        .await?
        .is_none()
    {
        return Err(RepoError::NotFound(format!("Site not found: {site_id}")));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO livestock_event (id, site_id, event_date, kind, quantity, note, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(site_id)
    .bind(event_date)
    .bind(kind)
    .bind(quantity)
    .bind(note)
    .bind(now)
    .execute(pool)
    .await?;

    let event = sqlx::query_as::<_, LivestockEvent>(&format!(
        "SELECT {COLUMNS} FROM livestock_event WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(event)
}

/// Events for one site, newest first.
pub async fn list_for_site(
    pool: &SqlitePool,
    site_id: i64,
    limit: i64,
) -> RepoResult<Vec<LivestockEvent>> {
    let events = sqlx::query_as::<_, LivestockEvent>(&format!(
        "SELECT {COLUMNS} FROM livestock_event WHERE site_id = ? ORDER BY event_date DESC, id DESC LIMIT ?"
    ))
    .bind(site_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

/// Total booked losses for a site, optionally restricted to events on or
/// after `since`.
pub async fn loss_total(
    pool: &SqlitePool,
    site_id: i64,
    since: Option<NaiveDate>,
) -> RepoResult<i64> {
    let total: i64 = match since {
        Some(since) => {
            sqlx::query_scalar(
                "SELECT COALESCE(SUM(quantity), 0) FROM livestock_event WHERE site_id = ?1 AND kind = 'loss' AND event_date >= ?2",
            )
            .bind(site_id)
            .bind(since)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar(
                "SELECT COALESCE(SUM(quantity), 0) FROM livestock_event WHERE site_id = ? AND kind = 'loss'",
            )
            .bind(site_id)
            .fetch_one(pool)
            .await?
        }
    };
    Ok(total)
}

/// Most recent date an event of `kind` was recorded for a site.
pub async fn last_event_date(
    pool: &SqlitePool,
    site_id: i64,
    kind: LivestockEventKind,
) -> RepoResult<Option<NaiveDate>> {
    let date: Option<NaiveDate> = sqlx::query_scalar(
        "SELECT MAX(event_date) FROM livestock_event WHERE site_id = ?1 AND kind = ?2",
    )
    .bind(site_id)
    .bind(kind)
    .fetch_one(pool)
    .await?;
    Ok(date)
}
