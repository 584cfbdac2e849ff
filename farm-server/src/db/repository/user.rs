//! User Repository
//!
//! Users and their module memberships. The raw PIN never reaches this
//! layer — callers pass the derived `pin_index` (see `auth::pin`).

use super::{RepoError, RepoResult};
use shared::models::{User, UserWithModules};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, username, pin_index, is_admin, created_at";

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    pin_index: &str,
    is_admin: bool,
) -> RepoResult<User> {
    if find_by_username(pool, username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Username already taken: {username}"
        )));
    }
    if find_by_pin_index(pool, pin_index).await?.is_some() {
        // Login resolves users by PIN alone, so two users must never share one.
        return Err(RepoError::Duplicate("PIN already in use".to_string()));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO user (id, username, pin_index, is_admin, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(username)
    .bind(pin_index)
    .bind(is_admin)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User not found: {id}")))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user =
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM user WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// PIN login lookup: the digest identifies the user.
pub async fn find_by_pin_index(pool: &SqlitePool, pin_index: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM user WHERE pin_index = ?"
    ))
    .bind(pin_index)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM user ORDER BY username"
    ))
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// All users with their resolved membership sets, for the admin screen.
pub async fn list_with_modules(pool: &SqlitePool) -> RepoResult<Vec<UserWithModules>> {
    let users = list_all(pool).await?;
    let mut result = Vec::with_capacity(users.len());
    for user in users {
        let module_ids = module_ids_for_user(pool, user.id).await?;
        result.push(UserWithModules { user, module_ids });
    }
    Ok(result)
}

pub async fn update_pin_index(pool: &SqlitePool, id: i64, pin_index: &str) -> RepoResult<()> {
    if let Some(other) = find_by_pin_index(pool, pin_index).await?
        && other.id != id
    {
        return Err(RepoError::Duplicate("PIN already in use".to_string()));
    }
    let result = sqlx::query("UPDATE user SET pin_index = ? WHERE id = ?")
        .bind(pin_index)
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User not found: {id}")));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    // Memberships go with the user (ON DELETE CASCADE)
    let result = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User not found: {id}")));
    }
    Ok(())
}

// ── Module memberships ──────────────────────────────────────────────

/// Explicit membership grants for a user. An empty result means "no
/// memberships recorded", which the access resolver treats differently
/// from an empty grant — see `access::can_access`.
pub async fn module_ids_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> =
        sqlx::query_scalar("SELECT module_id FROM user_module WHERE user_id = ? ORDER BY module_id")
            .bind(user_id)
            .fetch_all(pool)
            .await?;
    Ok(ids)
}

/// Replace a user's membership set in one transaction.
pub async fn set_modules(pool: &SqlitePool, user_id: i64, module_ids: &[i64]) -> RepoResult<()> {
    if find_by_id(pool, user_id).await?.is_none() {
        return Err(RepoError::NotFound(format!("User not found: {user_id}")));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM user_module WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    for module_id in module_ids {
        sqlx::query("INSERT OR IGNORE INTO user_module (user_id, module_id) VALUES (?1, ?2)")
            .bind(user_id)
            .bind(module_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Grant every registered module to a user, keeping existing grants.
/// Set union by identity; safe to run on every startup.
pub async fn grant_all_modules(pool: &SqlitePool, user_id: i64) -> RepoResult<u64> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO user_module (user_id, module_id) SELECT ?1, id FROM module",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{module, test_support::test_pool};

    #[tokio::test]
    async fn create_and_lookup_by_pin_index() {
        let pool = test_pool().await;
        let user = create(&pool, "anna", "digest-anna", false).await.unwrap();
        assert_eq!(user.username, "anna");
        assert!(!user.is_admin);

        let found = find_by_pin_index(&pool, "digest-anna").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);
        assert!(find_by_pin_index(&pool, "digest-other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_and_pin_are_rejected() {
        let pool = test_pool().await;
        create(&pool, "anna", "digest-1", false).await.unwrap();

        let err = create(&pool, "anna", "digest-2", false).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let err = create(&pool, "ben", "digest-1", false).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn set_modules_replaces_the_membership_set() {
        let pool = test_pool().await;
        let user = create(&pool, "anna", "digest-1", false).await.unwrap();
        let eggs = module::ensure_module(&pool, "eggs", "Eggs", "/eggs", false, true)
            .await
            .unwrap();
        let tasks = module::ensure_module(&pool, "tasks", "Tasks", "/tasks", false, true)
            .await
            .unwrap();

        set_modules(&pool, user.id, &[eggs.id, tasks.id]).await.unwrap();
        assert_eq!(module_ids_for_user(&pool, user.id).await.unwrap().len(), 2);

        set_modules(&pool, user.id, &[tasks.id]).await.unwrap();
        let ids = module_ids_for_user(&pool, user.id).await.unwrap();
        assert_eq!(ids, vec![tasks.id]);

        set_modules(&pool, user.id, &[]).await.unwrap();
        assert!(module_ids_for_user(&pool, user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn grant_all_modules_is_idempotent_union() {
        let pool = test_pool().await;
        let admin = create(&pool, "admin", "digest-admin", true).await.unwrap();
        let eggs = module::ensure_module(&pool, "eggs", "Eggs", "/eggs", false, true)
            .await
            .unwrap();
        module::ensure_module(&pool, "tasks", "Tasks", "/tasks", false, true)
            .await
            .unwrap();

        // Pre-existing grant survives the union
        set_modules(&pool, admin.id, &[eggs.id]).await.unwrap();
        let granted = grant_all_modules(&pool, admin.id).await.unwrap();
        assert_eq!(granted, 1);
        assert_eq!(module_ids_for_user(&pool, admin.id).await.unwrap().len(), 2);

        // Second pass grants nothing new
        assert_eq!(grant_all_modules(&pool, admin.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_cascades_memberships() {
        let pool = test_pool().await;
        let user = create(&pool, "anna", "digest-1", false).await.unwrap();
        let eggs = module::ensure_module(&pool, "eggs", "Eggs", "/eggs", false, true)
            .await
            .unwrap();
        set_modules(&pool, user.id, &[eggs.id]).await.unwrap();

        delete(&pool, user.id).await.unwrap();
        assert!(find_by_id(&pool, user.id).await.unwrap().is_none());
        assert!(module_ids_for_user(&pool, user.id).await.unwrap().is_empty());
    }
}
