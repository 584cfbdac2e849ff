//! Farm Site Repository

use super::{RepoError, RepoResult};
use shared::models::{FarmSite, FarmSiteCreate, FarmSiteUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, active, hens_start, hens_adjust, created_at";

pub async fn create(pool: &SqlitePool, payload: &FarmSiteCreate) -> RepoResult<FarmSite> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    if find_by_name(pool, name).await?.is_some() {
        return Err(RepoError::Duplicate(format!("Site already exists: {name}")));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO farm_site (id, name, active, hens_start, hens_adjust, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(name)
    .bind(payload.active)
    .bind(payload.hens_start)
    .bind(payload.hens_adjust)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Site not found: {id}")))
}

pub async fn update(pool: &SqlitePool, id: i64, payload: &FarmSiteUpdate) -> RepoResult<FarmSite> {
    if find_by_id(pool, id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Site not found: {id}")));
    }
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(RepoError::Validation("name must not be empty".into()));
        }
        if let Some(other) = find_by_name(pool, name.trim()).await?
            && other.id != id
        {
            return Err(RepoError::Duplicate(format!("Site already exists: {name}")));
        }
    }

    sqlx::query(
        "UPDATE farm_site SET name = COALESCE(?1, name), active = COALESCE(?2, active), hens_start = COALESCE(?3, hens_start), hens_adjust = COALESCE(?4, hens_adjust) WHERE id = ?5",
    )
    .bind(payload.name.as_deref().map(str::trim))
    .bind(payload.active)
    .bind(payload.hens_start)
    .bind(payload.hens_adjust)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Site not found: {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM farm_site WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Site not found: {id}")));
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<FarmSite>> {
    let site =
        sqlx::query_as::<_, FarmSite>(&format!("SELECT {COLUMNS} FROM farm_site WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(site)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<FarmSite>> {
    let site =
        sqlx::query_as::<_, FarmSite>(&format!("SELECT {COLUMNS} FROM farm_site WHERE name = ?"))
            .bind(name)
            .fetch_optional(pool)
            .await?;
    Ok(site)
}

pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<FarmSite>> {
    let sites =
        sqlx::query_as::<_, FarmSite>(&format!("SELECT {COLUMNS} FROM farm_site ORDER BY name"))
            .fetch_all(pool)
            .await?;
    Ok(sites)
}

pub async fn list_active(pool: &SqlitePool) -> RepoResult<Vec<FarmSite>> {
    let sites = sqlx::query_as::<_, FarmSite>(&format!(
        "SELECT {COLUMNS} FROM farm_site WHERE active = 1 ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn payload(name: &str, hens_start: i64) -> FarmSiteCreate {
        FarmSiteCreate {
            name: name.to_string(),
            active: true,
            hens_start,
            hens_adjust: 0,
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicates_and_blank_names() {
        let pool = test_pool().await;
        create(&pool, &payload("Mobile 1", 220)).await.unwrap();

        assert!(matches!(
            create(&pool, &payload("Mobile 1", 100)).await.unwrap_err(),
            RepoError::Duplicate(_)
        ));
        assert!(matches!(
            create(&pool, &payload("  ", 100)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn update_merges_only_provided_fields() {
        let pool = test_pool().await;
        let site = create(&pool, &payload("Mobile 1", 220)).await.unwrap();

        let after = update(
            &pool,
            site.id,
            &FarmSiteUpdate {
                name: None,
                active: None,
                hens_start: None,
                hens_adjust: Some(-3),
            },
        )
        .await
        .unwrap();
        assert_eq!(after.name, "Mobile 1");
        assert_eq!(after.hens_start, 220);
        assert_eq!(after.hens_adjust, -3);
    }

    #[tokio::test]
    async fn list_active_excludes_retired_sites() {
        let pool = test_pool().await;
        create(&pool, &payload("Mobile 1", 220)).await.unwrap();
        let retired = create(&pool, &payload("Old Barn", 0)).await.unwrap();
        update(
            &pool,
            retired.id,
            &FarmSiteUpdate {
                name: None,
                active: Some(false),
                hens_start: None,
                hens_adjust: None,
            },
        )
        .await
        .unwrap();

        let active = list_active(&pool).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Mobile 1");
    }
}
