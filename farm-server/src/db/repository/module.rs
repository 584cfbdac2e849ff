//! Module Registry Repository
//!
//! Feature modules are seeded from code at startup. [`ensure_module`] is
//! the reconcile primitive: safe to run on every boot, and it never
//! overwrites a label an admin may have renamed.

use super::{RepoError, RepoResult};
use shared::models::Module;
use sqlx::SqlitePool;

/// Upsert a module by key.
///
/// Missing key: inserted with the given attributes. Existing key: endpoint,
/// admin flag and active flag are corrected to the declared values when they
/// drifted; an identical declaration issues no write at all. The stored
/// label is never reconciled — an operator may have renamed the module.
pub async fn ensure_module(
    pool: &SqlitePool,
    key: &str,
    label: &str,
    endpoint: &str,
    admin_only: bool,
    active: bool,
) -> RepoResult<Module> {
    if let Some(existing) = find_by_key(pool, key).await? {
        if existing.endpoint == endpoint
            && existing.admin_only == admin_only
            && existing.active == active
        {
            return Ok(existing);
        }
        sqlx::query("UPDATE module SET endpoint = ?1, admin_only = ?2, active = ?3 WHERE id = ?4")
            .bind(endpoint)
            .bind(admin_only)
            .bind(active)
            .bind(existing.id)
            .execute(pool)
            .await?;

        return find_by_key(pool, key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Module not found: {key}")));
    }

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO module (id, key, label, endpoint, active, admin_only) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(key)
    .bind(label)
    .bind(endpoint)
    .bind(active)
    .bind(admin_only)
    .execute(pool)
    .await?;

    find_by_key(pool, key)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Module not found: {key}")))
}

pub async fn find_by_key(pool: &SqlitePool, key: &str) -> RepoResult<Option<Module>> {
    let module = sqlx::query_as::<_, Module>(
        "SELECT id, key, label, endpoint, active, admin_only FROM module WHERE key = ?",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(module)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Module>> {
    let module = sqlx::query_as::<_, Module>(
        "SELECT id, key, label, endpoint, active, admin_only FROM module WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(module)
}

/// All modules, active or not, in stable key order. Admin screens use this.
pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<Module>> {
    let modules = sqlx::query_as::<_, Module>(
        "SELECT id, key, label, endpoint, active, admin_only FROM module ORDER BY key",
    )
    .fetch_all(pool)
    .await?;
    Ok(modules)
}

pub async fn list_active(pool: &SqlitePool) -> RepoResult<Vec<Module>> {
    let modules = sqlx::query_as::<_, Module>(
        "SELECT id, key, label, endpoint, active, admin_only FROM module WHERE active = 1 ORDER BY key",
    )
    .fetch_all(pool)
    .await?;
    Ok(modules)
}

pub async fn set_active(pool: &SqlitePool, id: i64, active: bool) -> RepoResult<Module> {
    let result = sqlx::query("UPDATE module SET active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Module not found: {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Module not found: {id}")))
}
