//! Cattle Registry Repository
//!
//! Herd register with per-animal history entries (vaccinations,
//! medications, inseminations). An exit removes the animal and its
//! history; the register never keeps tombstones.

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{
    Cattle, CattleCreate, CattleEvent, CattleEventKind, CattleUpdate, HerdBookEntry,
};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, ear_tag, birth_date, breed, created_at";
const EVENT_COLUMNS: &str = "id, cattle_id, event_date, kind, label, dose, created_at";

/// Herd intake: register a new animal.
pub async fn create(pool: &SqlitePool, payload: &CattleCreate) -> RepoResult<Cattle> {
    let name = payload.name.trim();
    let ear_tag = payload.ear_tag.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    if ear_tag.is_empty() {
        return Err(RepoError::Validation("ear_tag must not be empty".into()));
    }
    if find_by_ear_tag(pool, ear_tag).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Ear tag already registered: {ear_tag}"
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO cattle (id, name, ear_tag, birth_date, breed, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(name)
    .bind(ear_tag)
    .bind(payload.birth_date)
    .bind(payload.breed.as_deref())
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Animal not found: {id}")))
}

/// Update master data. Missing fields keep their current value.
pub async fn update(pool: &SqlitePool, id: i64, payload: &CattleUpdate) -> RepoResult<Cattle> {
    if find_by_id(pool, id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Animal not found: {id}")));
    }
    if let Some(name) = &payload.name
        && name.trim().is_empty()
    {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    if let Some(ear_tag) = &payload.ear_tag {
        if ear_tag.trim().is_empty() {
            return Err(RepoError::Validation("ear_tag must not be empty".into()));
        }
        if let Some(other) = find_by_ear_tag(pool, ear_tag.trim()).await?
            && other.id != id
        {
            return Err(RepoError::Duplicate(format!(
                "Ear tag already registered: {ear_tag}"
            )));
        }
    }

    sqlx::query(
        "UPDATE cattle SET name = COALESCE(?1, name), ear_tag = COALESCE(?2, ear_tag), breed = COALESCE(?3, breed) WHERE id = ?4",
    )
    .bind(payload.name.as_deref().map(str::trim))
    .bind(payload.ear_tag.as_deref().map(str::trim))
    .bind(payload.breed.as_deref())
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Animal not found: {id}")))
}

/// Herd exit: remove the animal and its history.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM cattle WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Animal not found: {id}")));
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Cattle>> {
    let animal = sqlx::query_as::<_, Cattle>(&format!("SELECT {COLUMNS} FROM cattle WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(animal)
}

pub async fn find_by_ear_tag(pool: &SqlitePool, ear_tag: &str) -> RepoResult<Option<Cattle>> {
    let animal =
        sqlx::query_as::<_, Cattle>(&format!("SELECT {COLUMNS} FROM cattle WHERE ear_tag = ?"))
            .bind(ear_tag)
            .fetch_optional(pool)
            .await?;
    Ok(animal)
}

pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<Cattle>> {
    let herd = sqlx::query_as::<_, Cattle>(&format!("SELECT {COLUMNS} FROM cattle ORDER BY name"))
        .fetch_all(pool)
        .await?;
    Ok(herd)
}

/// Record a history entry for one animal.
///
/// Vaccinations and medications need a label (vaccine type, medication
/// name); a dose is only meaningful for medications and dropped elsewhere.
pub async fn add_event(
    pool: &SqlitePool,
    cattle_id: i64,
    event_date: NaiveDate,
    kind: CattleEventKind,
    label: Option<&str>,
    dose: Option<&str>,
) -> RepoResult<CattleEvent> {
    if kind != CattleEventKind::Insemination && label.unwrap_or("").trim().is_empty() {
        return Err(RepoError::Validation(format!(
            "a {} entry needs a label",
            kind.as_str()
        )));
    }
    let dose = if kind == CattleEventKind::Medication {
        dose
    } else {
        None
    };

    if find_by_id(pool, cattle_id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Animal not found: {cattle_id}")));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO cattle_event (id, cattle_id, event_date, kind, label, dose, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(cattle_id)
    .bind(event_date)
    .bind(kind)
    .bind(label.map(str::trim))
    .bind(dose)
    .bind(now)
    .execute(pool)
    .await?;

    let event = sqlx::query_as::<_, CattleEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM cattle_event WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(event)
}

/// Remove one history entry. The entry must belong to the given animal.
pub async fn delete_event(pool: &SqlitePool, cattle_id: i64, event_id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM cattle_event WHERE id = ?1 AND cattle_id = ?2")
        .bind(event_id)
        .bind(cattle_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Entry not found: {event_id}")));
    }
    Ok(())
}

/// History for one animal, newest first.
pub async fn events_for(pool: &SqlitePool, cattle_id: i64) -> RepoResult<Vec<CattleEvent>> {
    let events = sqlx::query_as::<_, CattleEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM cattle_event WHERE cattle_id = ? ORDER BY event_date DESC, id DESC"
    ))
    .bind(cattle_id)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

/// The whole herd with each animal's history, name order.
pub async fn herd_book(pool: &SqlitePool) -> RepoResult<Vec<HerdBookEntry>> {
    let herd = list_all(pool).await?;
    let mut book = Vec::with_capacity(herd.len());
    for animal in herd {
        let events = events_for(pool, animal.id).await?;
        book.push(HerdBookEntry {
            cattle: animal,
            events,
        });
    }
    Ok(book)
}
