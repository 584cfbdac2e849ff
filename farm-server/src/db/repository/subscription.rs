//! Subscription Repository
//!
//! Weekly egg subscriptions. The booking workflow itself lives in the
//! `subscriptions` domain module; this layer owns CRUD, validation and the
//! due-today query.

use super::{RepoError, RepoResult};
use chrono::{Datelike, NaiveDate};
use shared::models::{
    ExceptionAction, Subscription, SubscriptionCreate, SubscriptionException, SubscriptionUpdate,
};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, quantity, weekday, active, notes, created_at";

fn validate(name: &str, quantity: i64, weekday: i64) -> RepoResult<()> {
    if name.trim().is_empty() {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    if quantity <= 0 {
        return Err(RepoError::Validation("quantity must be positive".into()));
    }
    if !(0..=6).contains(&weekday) {
        return Err(RepoError::Validation(format!(
            "weekday must be between 0 (Monday) and 6 (Sunday), got {weekday}"
        )));
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, payload: &SubscriptionCreate) -> RepoResult<Subscription> {
    validate(&payload.name, payload.quantity, payload.weekday)?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO subscription (id, name, quantity, weekday, active, notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(payload.name.trim())
    .bind(payload.quantity)
    .bind(payload.weekday)
    .bind(payload.active)
    .bind(&payload.notes)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Subscription not found: {id}")))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    payload: &SubscriptionUpdate,
) -> RepoResult<Subscription> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Subscription not found: {id}")))?;

    let name = payload.name.as_deref().unwrap_or(&current.name);
    let quantity = payload.quantity.unwrap_or(current.quantity);
    let weekday = payload.weekday.unwrap_or(current.weekday);
    // Validate the merged record before any write
    validate(name, quantity, weekday)?;

    sqlx::query(
        "UPDATE subscription SET name = ?1, quantity = ?2, weekday = ?3, active = COALESCE(?4, active), notes = COALESCE(?5, notes) WHERE id = ?6",
    )
    .bind(name.trim())
    .bind(quantity)
    .bind(weekday)
    .bind(payload.active)
    .bind(&payload.notes)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Subscription not found: {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM subscription WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Subscription not found: {id}")));
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Subscription>> {
    let sub = sqlx::query_as::<_, Subscription>(&format!(
        "SELECT {COLUMNS} FROM subscription WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(sub)
}

pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<Subscription>> {
    let subs = sqlx::query_as::<_, Subscription>(&format!(
        "SELECT {COLUMNS} FROM subscription ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(subs)
}

/// Active subscriptions whose delivery weekday matches `date`, by name.
///
/// Weekday numbering is ISO-style 0 = Monday .. 6 = Sunday, independent of
/// locale.
pub async fn due_on(pool: &SqlitePool, date: NaiveDate) -> RepoResult<Vec<Subscription>> {
    let weekday = date.weekday().num_days_from_monday() as i64;
    let subs = sqlx::query_as::<_, Subscription>(&format!(
        "SELECT {COLUMNS} FROM subscription WHERE active = 1 AND weekday = ? ORDER BY name"
    ))
    .bind(weekday)
    .fetch_all(pool)
    .await?;
    Ok(subs)
}

// ── Schedule exceptions ─────────────────────────────────────────────

/// Record a one-off schedule exception.
///
/// `new_date` must be present for a shift and absent for a skip.
pub async fn add_exception(
    pool: &SqlitePool,
    subscription_id: i64,
    original_date: NaiveDate,
    action: ExceptionAction,
    new_date: Option<NaiveDate>,
) -> RepoResult<SubscriptionException> {
    match (action, new_date) {
        (ExceptionAction::Shift, None) => {
            return Err(RepoError::Validation(
                "a shifted pickup needs a new date".into(),
            ));
        }
        (ExceptionAction::Skip, Some(_)) => {
            return Err(RepoError::Validation(
                "a skipped pickup must not carry a new date".into(),
            ));
        }
        _ => {}
    }
    if find_by_id(pool, subscription_id).await?.is_none() {
        return Err(RepoError::NotFound(format!(
            "Subscription not found: {subscription_id}"
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO subscription_exception (id, subscription_id, original_date, action, new_date, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(subscription_id)
    .bind(original_date)
    .bind(action)
    .bind(new_date)
    .bind(now)
    .execute(pool)
    .await?;

    let exception = sqlx::query_as::<_, SubscriptionException>(
        "SELECT id, subscription_id, original_date, action, new_date, created_at FROM subscription_exception WHERE id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(exception)
}

pub async fn exceptions_for(
    pool: &SqlitePool,
    subscription_id: i64,
) -> RepoResult<Vec<SubscriptionException>> {
    let exceptions = sqlx::query_as::<_, SubscriptionException>(
        "SELECT id, subscription_id, original_date, action, new_date, created_at FROM subscription_exception WHERE subscription_id = ? ORDER BY original_date",
    )
    .bind(subscription_id)
    .fetch_all(pool)
    .await?;
    Ok(exceptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn payload(name: &str, quantity: i64, weekday: i64) -> SubscriptionCreate {
        SubscriptionCreate {
            name: name.to_string(),
            quantity,
            weekday,
            active: true,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_validates_before_writing() {
        let pool = test_pool().await;
        assert!(matches!(
            create(&pool, &payload("", 10, 2)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            create(&pool, &payload("Huber", 0, 2)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            create(&pool, &payload("Huber", 10, 7)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(list_all(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_update_does_not_mutate() {
        let pool = test_pool().await;
        let sub = create(&pool, &payload("Huber", 10, 2)).await.unwrap();

        let err = update(
            &pool,
            sub.id,
            &SubscriptionUpdate {
                name: None,
                quantity: Some(-1),
                weekday: None,
                active: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let after = find_by_id(&pool, sub.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 10);
    }

    #[tokio::test]
    async fn due_on_matches_iso_weekday_and_orders_by_name() {
        let pool = test_pool().await;
        // 2025-03-05 is a Wednesday → ISO weekday 2
        let wednesday: NaiveDate = "2025-03-05".parse().unwrap();

        create(&pool, &payload("Zimmer", 6, 2)).await.unwrap();
        create(&pool, &payload("Huber", 10, 2)).await.unwrap();
        create(&pool, &payload("Maier", 12, 3)).await.unwrap();
        let inactive = create(&pool, &payload("Weber", 4, 2)).await.unwrap();
        update(
            &pool,
            inactive.id,
            &SubscriptionUpdate {
                name: None,
                quantity: None,
                weekday: None,
                active: Some(false),
                notes: None,
            },
        )
        .await
        .unwrap();

        let due = due_on(&pool, wednesday).await.unwrap();
        let names: Vec<&str> = due.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Huber", "Zimmer"]);
    }

    #[tokio::test]
    async fn exception_new_date_iff_shift() {
        let pool = test_pool().await;
        let sub = create(&pool, &payload("Huber", 10, 2)).await.unwrap();
        let original: NaiveDate = "2025-03-05".parse().unwrap();
        let shifted: NaiveDate = "2025-03-07".parse().unwrap();

        assert!(matches!(
            add_exception(&pool, sub.id, original, ExceptionAction::Shift, None)
                .await
                .unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            add_exception(&pool, sub.id, original, ExceptionAction::Skip, Some(shifted))
                .await
                .unwrap_err(),
            RepoError::Validation(_)
        ));

        add_exception(&pool, sub.id, original, ExceptionAction::Skip, None)
            .await
            .unwrap();
        let shift = add_exception(&pool, sub.id, shifted, ExceptionAction::Shift, Some(shifted))
            .await
            .unwrap();
        assert_eq!(shift.new_date, Some(shifted));
        assert_eq!(exceptions_for(&pool, sub.id).await.unwrap().len(), 2);
    }
}
