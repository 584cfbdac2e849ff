//! Subscription Booking
//!
//! Turns the day's subscription selections into disposal entries on the
//! egg ledger. The whole pass runs in one transaction: either every
//! selected pickup is booked against sufficient stock, or none is.

use crate::db::repository::ledger;
use crate::db::repository::{RepoError, RepoResult};
use chrono::NaiveDate;
use serde::Serialize;
use shared::models::Subscription;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Outcome of a booking pass. `count == 0` is the "nothing booked"
/// outcome, reported as a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub count: i64,
    pub total: i64,
}

/// Book the selected subscriptions for `today`.
///
/// `selections` maps subscription ID to an optional quantity override:
/// a positive override replaces the subscription's default quantity, any
/// other value falls back to it. Selections that resolve to a missing or
/// meanwhile-deactivated subscription, or to a non-positive quantity, are
/// skipped silently — partial submissions are the normal case, not an
/// error.
///
/// Fails with [`RepoError::InsufficientStock`] when the selections exceed
/// the ledger balance; nothing is booked in that case.
pub async fn book_today(
    pool: &SqlitePool,
    selections: &HashMap<i64, Option<i64>>,
    today: NaiveDate,
    time_of_day: Option<&str>,
    actor: Option<&str>,
) -> RepoResult<BookingSummary> {
    let mut ids: Vec<i64> = selections.keys().copied().collect();
    ids.sort_unstable();

    // Immediate transaction: the pass reads the balance before writing, so
    // it must hold the write lock from the start rather than fail on the
    // read-to-write upgrade under a concurrent disposal.
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;
    let mut count = 0;
    let mut total = 0;

    for id in ids {
        // Re-validate inside the transaction: the subscription may have
        // been deactivated or deleted since the form was rendered.
        let sub = sqlx::query_as::<_, Subscription>(
            "SELECT id, name, quantity, weekday, active, notes, created_at FROM subscription WHERE id = ? AND active = 1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(sub) = sub else { continue };

        let quantity = match selections.get(&id) {
            Some(&Some(q)) if q > 0 => q,
            Some(&Some(_)) => continue,
            _ => sub.quantity,
        };
        if quantity <= 0 {
            continue;
        }

        let label = format!("Subscription {}", sub.name);
        ledger::record_disposal_in(&mut tx, quantity, actor, Some(&label), today, time_of_day)
            .await?;
        count += 1;
        total += quantity;
    }

    tx.commit().await?;
    Ok(BookingSummary { count, total })
}
