//! Timesheet Repository
//!
//! Clock-in/clock-out spans per user. At most one span per user may be
//! open at a time.

use super::{RepoError, RepoResult};
use shared::models::{TimeEntry, TimeSummary};
use sqlx::SqlitePool;

/// Open a new span. Fails if the user already has one open.
pub async fn clock_in(pool: &SqlitePool, user_id: i64, at: i64) -> RepoResult<TimeEntry> {
    if open_entry(pool, user_id).await?.is_some() {
        return Err(RepoError::Validation("already clocked in".into()));
    }

    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO time_entry (id, user_id, clock_in, clock_out) VALUES (?1, ?2, ?3, NULL)")
        .bind(id)
        .bind(user_id)
        .bind(at)
        .execute(pool)
        .await?;

    Ok(TimeEntry {
        id,
        user_id,
        clock_in: at,
        clock_out: None,
    })
}

/// Close the user's open span. Fails if there is none.
pub async fn clock_out(pool: &SqlitePool, user_id: i64, at: i64) -> RepoResult<TimeEntry> {
    let open = open_entry(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound("no open time entry".into()))?;
    if at < open.clock_in {
        return Err(RepoError::Validation(
            "clock-out must not precede clock-in".into(),
        ));
    }

    sqlx::query("UPDATE time_entry SET clock_out = ?1 WHERE id = ?2")
        .bind(at)
        .bind(open.id)
        .execute(pool)
        .await?;

    Ok(TimeEntry {
        clock_out: Some(at),
        ..open
    })
}

pub async fn open_entry(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<TimeEntry>> {
    let entry = sqlx::query_as::<_, TimeEntry>(
        "SELECT id, user_id, clock_in, clock_out FROM time_entry WHERE user_id = ? AND clock_out IS NULL",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(entry)
}

pub async fn entries_for_user(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> RepoResult<Vec<TimeEntry>> {
    let entries = sqlx::query_as::<_, TimeEntry>(
        "SELECT id, user_id, clock_in, clock_out FROM time_entry WHERE user_id = ? ORDER BY clock_in DESC LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Total worked hours per user over closed spans, optionally from a
/// timestamp (millis) onward. Open spans are not counted.
pub async fn summary(pool: &SqlitePool, since: Option<i64>) -> RepoResult<Vec<TimeSummary>> {
    let rows: Vec<(i64, String, i64)> = sqlx::query_as(
        "SELECT u.id, u.username, COALESCE(SUM(t.clock_out - t.clock_in), 0) \
         FROM user u \
         LEFT JOIN time_entry t ON t.user_id = u.id AND t.clock_out IS NOT NULL AND t.clock_in >= ?1 \
         GROUP BY u.id, u.username ORDER BY u.username",
    )
    .bind(since.unwrap_or(0))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(user_id, username, millis)| TimeSummary {
            user_id,
            username,
            total_hours: (millis as f64 / 3_600_000.0 * 100.0).round() / 100.0,
        })
        .collect())
}
