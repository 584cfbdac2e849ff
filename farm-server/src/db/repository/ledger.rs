//! Egg Ledger Repository
//!
//! Append-only movement log. The balance is derived on every call, never
//! cached — any two request contexts may race, so there is nothing safe to
//! memoize.
//!
//! Disposal recording is the one guarded write path: the balance check and
//! the insert run inside a single transaction so concurrent disposals
//! cannot overdraw the stock.

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{DayTotals, LedgerEntry, MovementKind, PeriodTotals};
use sqlx::{SqliteConnection, SqlitePool};

/// Derived stock: sum(production) - sum(disposal) over the whole ledger.
pub async fn balance<'e, E>(executor: E) -> RepoResult<i64>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let bal: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(CASE WHEN kind = 'production' THEN quantity ELSE -quantity END), 0) FROM ledger_entry",
    )
    .fetch_one(executor)
    .await?;
    Ok(bal)
}

/// Record a production movement.
pub async fn record_production(
    pool: &SqlitePool,
    quantity: i64,
    actor: Option<&str>,
    label: Option<&str>,
    site_id: Option<i64>,
    entry_date: NaiveDate,
    time_of_day: Option<&str>,
) -> RepoResult<LedgerEntry> {
    let mut conn = pool.acquire().await?;
    insert_entry(
        &mut conn,
        MovementKind::Production,
        quantity,
        actor,
        label,
        site_id,
        entry_date,
        time_of_day,
    )
    .await
}

/// Record a disposal movement, guarded by the current balance.
///
/// Runs in its own transaction; see [`record_disposal_in`] for the guarded
/// write used inside larger transactions (subscription booking).
pub async fn record_disposal(
    pool: &SqlitePool,
    quantity: i64,
    actor: Option<&str>,
    label: Option<&str>,
    entry_date: NaiveDate,
    time_of_day: Option<&str>,
) -> RepoResult<LedgerEntry> {
    // Take the write lock up front: a deferred transaction would read the
    // balance under a snapshot and fail with SQLITE_BUSY_SNAPSHOT when a
    // concurrent disposal commits first, instead of waiting its turn.
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;
    let entry =
        record_disposal_in(&mut tx, quantity, actor, label, entry_date, time_of_day).await?;
    tx.commit().await?;
    Ok(entry)
}

/// Guarded disposal write on an open transaction.
///
/// Fails with [`RepoError::InsufficientStock`] when `quantity` exceeds the
/// balance visible to the transaction; the caller decides whether that
/// aborts a larger batch.
pub async fn record_disposal_in(
    conn: &mut SqliteConnection,
    quantity: i64,
    actor: Option<&str>,
    label: Option<&str>,
    entry_date: NaiveDate,
    time_of_day: Option<&str>,
) -> RepoResult<LedgerEntry> {
    if quantity <= 0 {
        return Err(RepoError::Validation("quantity must be positive".into()));
    }

    let available = balance(&mut *conn).await?;
    if quantity > available {
        return Err(RepoError::InsufficientStock(format!(
            "requested {quantity}, only {available} in stock"
        )));
    }

    insert_entry(
        conn,
        MovementKind::Disposal,
        quantity,
        actor,
        label,
        None,
        entry_date,
        time_of_day,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn insert_entry(
    conn: &mut SqliteConnection,
    kind: MovementKind,
    quantity: i64,
    actor: Option<&str>,
    label: Option<&str>,
    site_id: Option<i64>,
    entry_date: NaiveDate,
    time_of_day: Option<&str>,
) -> RepoResult<LedgerEntry> {
    if quantity <= 0 {
        return Err(RepoError::Validation("quantity must be positive".into()));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO ledger_entry (id, entry_date, time_of_day, kind, quantity, actor, label, site_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(entry_date)
    .bind(time_of_day)
    .bind(kind)
    .bind(quantity)
    .bind(actor)
    .bind(label)
    .bind(site_id)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(LedgerEntry {
        id,
        entry_date,
        time_of_day: time_of_day.map(str::to_string),
        kind,
        quantity,
        actor: actor.map(str::to_string),
        label: label.map(str::to_string),
        site_id,
        created_at: now,
    })
}

/// Production/disposal sums over an inclusive date range.
pub async fn totals_between(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> RepoResult<PeriodTotals> {
    let (production, disposal): (i64, i64) = sqlx::query_as(
        "SELECT \
            COALESCE(SUM(CASE WHEN kind = 'production' THEN quantity ELSE 0 END), 0), \
            COALESCE(SUM(CASE WHEN kind = 'disposal' THEN quantity ELSE 0 END), 0) \
         FROM ledger_entry WHERE entry_date >= ?1 AND entry_date <= ?2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(PeriodTotals {
        production,
        disposal,
        net: production - disposal,
    })
}

/// Dense per-day series over an inclusive date range.
///
/// Returns exactly `end - start + 1` rows; days without entries report
/// zero activity rather than being absent.
pub async fn daily_series(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> RepoResult<Vec<DayTotals>> {
    if start > end {
        return Err(RepoError::Validation(format!(
            "invalid range: {start} is after {end}"
        )));
    }

    let rows: Vec<(NaiveDate, i64, i64)> = sqlx::query_as(
        "SELECT entry_date, \
            COALESCE(SUM(CASE WHEN kind = 'production' THEN quantity ELSE 0 END), 0), \
            COALESCE(SUM(CASE WHEN kind = 'disposal' THEN quantity ELSE 0 END), 0) \
         FROM ledger_entry WHERE entry_date >= ?1 AND entry_date <= ?2 \
         GROUP BY entry_date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let mut series = Vec::with_capacity((end - start).num_days() as usize + 1);
    let mut day = start;
    while day <= end {
        let (production, disposal) = rows
            .iter()
            .find(|(d, _, _)| *d == day)
            .map(|(_, p, a)| (*p, *a))
            .unwrap_or((0, 0));
        series.push(DayTotals {
            date: day,
            production,
            disposal,
        });
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    Ok(series)
}

/// Latest entries, newest first (by date, then time of day).
pub async fn recent_entries(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<LedgerEntry>> {
    let rows = sqlx::query_as::<_, LedgerEntry>(
        "SELECT id, entry_date, time_of_day, kind, quantity, actor, label, site_id, created_at \
         FROM ledger_entry ORDER BY entry_date DESC, time_of_day DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Production attributed to one site since `since` (inclusive).
///
/// Attribution is by the `site_id` foreign key. Rows written before the FK
/// existed have `site_id = NULL`; for those the old label-substring match
/// is kept as a legacy fallback. Overlapping site names can misattribute
/// legacy rows — that matches the historical behavior.
pub async fn production_for_site_since(
    pool: &SqlitePool,
    site_id: i64,
    site_name: &str,
    since: NaiveDate,
) -> RepoResult<i64> {
    let pattern = format!("%{site_name}%");
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity), 0) FROM ledger_entry \
         WHERE kind = 'production' AND entry_date >= ?1 \
           AND (site_id = ?2 OR (site_id IS NULL AND label LIKE ?3))",
    )
    .bind(since)
    .bind(site_id)
    .bind(&pattern)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn balance_is_production_minus_disposal() {
        let pool = test_pool().await;
        record_production(&pool, 30, Some("anna"), None, None, d("2025-03-03"), None)
            .await
            .unwrap();
        record_production(&pool, 12, Some("anna"), None, None, d("2025-03-04"), None)
            .await
            .unwrap();
        record_disposal(&pool, 10, Some("anna"), None, d("2025-03-04"), None)
            .await
            .unwrap();

        assert_eq!(balance(&pool).await.unwrap(), 32);
    }

    #[tokio::test]
    async fn empty_ledger_has_zero_balance() {
        let pool = test_pool().await;
        assert_eq!(balance(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn production_rejects_non_positive_quantity() {
        let pool = test_pool().await;
        let err = record_production(&pool, 0, None, None, None, d("2025-03-03"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let err = record_production(&pool, -5, None, None, None, d("2025-03-03"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn disposal_over_balance_fails_and_leaves_balance_unchanged() {
        let pool = test_pool().await;
        record_production(&pool, 10, None, None, None, d("2025-03-03"), None)
            .await
            .unwrap();

        let err = record_disposal(&pool, 11, None, None, d("2025-03-03"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::InsufficientStock(_)));
        assert_eq!(balance(&pool).await.unwrap(), 10);

        // Exactly the balance is fine
        record_disposal(&pool, 10, None, None, d("2025-03-03"), None)
            .await
            .unwrap();
        assert_eq!(balance(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_disposals_surface_as_stock_errors() {
        // File-backed pool: the in-memory fixture has a single connection
        // and cannot race with itself.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let pool = crate::db::DbService::new(path.to_str().unwrap())
            .await
            .unwrap()
            .pool;

        record_production(&pool, 10, None, None, None, d("2025-03-03"), None)
            .await
            .unwrap();

        let (a, b) = tokio::join!(
            record_disposal(&pool, 6, None, None, d("2025-03-03"), None),
            record_disposal(&pool, 6, None, None, d("2025-03-03"), None),
        );
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(RepoError::InsufficientStock(_))))
        );
        assert_eq!(balance(&pool).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn daily_series_is_dense_and_zero_filled() {
        let pool = test_pool().await;
        record_production(&pool, 20, None, None, None, d("2025-03-01"), None)
            .await
            .unwrap();
        record_production(&pool, 5, None, None, None, d("2025-03-03"), None)
            .await
            .unwrap();
        record_disposal(&pool, 7, None, None, d("2025-03-03"), None)
            .await
            .unwrap();

        let series = daily_series(&pool, d("2025-03-01"), d("2025-03-04"))
            .await
            .unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].production, 20);
        assert_eq!(series[1].production, 0);
        assert_eq!(series[1].disposal, 0);
        assert_eq!(series[2].production, 5);
        assert_eq!(series[2].disposal, 7);
        assert_eq!(series[3].production, 0);

        // Sum over the range matches the range totals
        let totals = totals_between(&pool, d("2025-03-01"), d("2025-03-04"))
            .await
            .unwrap();
        let prod_sum: i64 = series.iter().map(|dt| dt.production).sum();
        assert_eq!(prod_sum, totals.production);
    }

    #[tokio::test]
    async fn daily_series_rejects_inverted_range() {
        let pool = test_pool().await;
        let err = daily_series(&pool, d("2025-03-04"), d("2025-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn totals_between_is_range_restricted() {
        let pool = test_pool().await;
        record_production(&pool, 20, None, None, None, d("2025-02-28"), None)
            .await
            .unwrap();
        record_production(&pool, 7, None, None, None, d("2025-03-01"), None)
            .await
            .unwrap();

        let totals = totals_between(&pool, d("2025-03-01"), d("2025-03-31"))
            .await
            .unwrap();
        assert_eq!(totals.production, 7);
        assert_eq!(totals.net, 7);
    }

    #[tokio::test]
    async fn site_production_prefers_fk_and_falls_back_to_label() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO farm_site (id, name, active, hens_start, hens_adjust, created_at) VALUES (1, 'Mobile 1', 1, 0, 0, 0)")
            .execute(&pool)
            .await
            .unwrap();

        // FK-attributed row
        record_production(
            &pool,
            10,
            None,
            Some("Production Mobile 1"),
            Some(1),
            d("2025-03-03"),
            None,
        )
        .await
        .unwrap();
        // Legacy row: no FK, label match only
        record_production(
            &pool,
            4,
            None,
            Some("Production Mobile 1"),
            None,
            d("2025-03-04"),
            None,
        )
        .await
        .unwrap();
        // Unrelated production
        record_production(&pool, 99, None, Some("Production Barn"), None, d("2025-03-04"), None)
            .await
            .unwrap();

        let total = production_for_site_since(&pool, 1, "Mobile 1", d("2025-03-01"))
            .await
            .unwrap();
        assert_eq!(total, 14);
    }

    #[tokio::test]
    async fn recent_entries_are_newest_first() {
        let pool = test_pool().await;
        record_production(&pool, 1, None, None, None, d("2025-03-01"), Some("08:00"))
            .await
            .unwrap();
        record_production(&pool, 2, None, None, None, d("2025-03-02"), Some("08:00"))
            .await
            .unwrap();
        record_production(&pool, 3, None, None, None, d("2025-03-02"), Some("17:30"))
            .await
            .unwrap();

        let entries = recent_entries(&pool, 2).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].quantity, 3);
        assert_eq!(entries[1].quantity, 2);
    }
}
