//! Task Repository

use super::{RepoError, RepoResult};
use shared::models::{Task, TaskCreate, TaskUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, title, description, assignee_id, interval, done, created_at";

pub async fn create(pool: &SqlitePool, payload: &TaskCreate) -> RepoResult<Task> {
    if payload.title.trim().is_empty() {
        return Err(RepoError::Validation("title must not be empty".into()));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO task (id, title, description, assignee_id, interval, done, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
    )
    .bind(id)
    .bind(payload.title.trim())
    .bind(&payload.description)
    .bind(payload.assignee_id)
    .bind(&payload.interval)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Task not found: {id}")))
}

pub async fn update(pool: &SqlitePool, id: i64, payload: &TaskUpdate) -> RepoResult<Task> {
    if find_by_id(pool, id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Task not found: {id}")));
    }
    if let Some(title) = &payload.title
        && title.trim().is_empty()
    {
        return Err(RepoError::Validation("title must not be empty".into()));
    }

    sqlx::query(
        "UPDATE task SET title = COALESCE(?1, title), description = COALESCE(?2, description), assignee_id = COALESCE(?3, assignee_id), interval = COALESCE(?4, interval), done = COALESCE(?5, done) WHERE id = ?6",
    )
    .bind(payload.title.as_deref().map(str::trim))
    .bind(&payload.description)
    .bind(payload.assignee_id)
    .bind(&payload.interval)
    .bind(payload.done)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Task not found: {id}")))
}

/// Mark a task done. A recurring task spawns its next occurrence instead of
/// staying closed: the finished copy is kept, a fresh open task with the
/// same title, description, assignee and interval is created.
pub async fn complete(pool: &SqlitePool, id: i64) -> RepoResult<Task> {
    let task = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Task not found: {id}")))?;

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE task SET done = 1 WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if task.interval.is_some() && !task.done {
        let next_id = shared::util::snowflake_id();
        let now = shared::util::now_millis();
        sqlx::query(
            "INSERT INTO task (id, title, description, assignee_id, interval, done, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
        )
        .bind(next_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.assignee_id)
        .bind(&task.interval)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Task not found: {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM task WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Task not found: {id}")));
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Task>> {
    let task = sqlx::query_as::<_, Task>(&format!("SELECT {COLUMNS} FROM task WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(task)
}

/// Open tasks first, then finished ones, newest first within each group.
pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {COLUMNS} FROM task ORDER BY done, created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(tasks)
}

pub async fn list_open_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {COLUMNS} FROM task WHERE done = 0 AND (assignee_id IS NULL OR assignee_id = ?) ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(tasks)
}
