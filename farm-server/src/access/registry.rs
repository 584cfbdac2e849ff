//! Module Registry
//!
//! The feature catalog is declared in code; the `module` table is a
//! reconciled cache of that declaration. Reconciliation runs at every
//! startup and must leave the process usable even when a single upsert
//! fails.

use crate::auth::pin::pin_index;
use crate::db::repository::{RepoResult, module, site, user};
use sqlx::SqlitePool;

/// Declared feature modules: (key, label, endpoint, admin_only, active).
const SEED_MODULES: &[(&str, &str, &str, bool, bool)] = &[
    ("eggs", "Eggs", "/eggs", false, true),
    ("livestock", "Livestock", "/livestock", false, true),
    ("cattle", "Cattle", "/cattle", false, true),
    ("horses", "Horses", "/horses", false, true),
    ("subscribers", "Subscribers", "/subscriptions", false, true),
    ("tasks", "Tasks", "/tasks", false, true),
    ("timesheet", "Timesheet", "/timesheet", false, true),
    ("users", "Users", "/users", true, true),
    ("settings", "Settings", "/settings", true, true),
];

/// Default admin PIN, meant to be changed after first login.
const DEFAULT_ADMIN_PIN: &str = "0000";

const DEFAULT_SITES: &[&str] = &["Mobile 1", "Mobile 2", "Barn"];

/// Reconcile the module table with the declared catalog and make sure
/// every admin holds every module.
///
/// Individual upsert failures are logged and skipped — a partially
/// inconsistent catalog must not abort startup.
pub async fn reconcile(pool: &SqlitePool) {
    for &(key, label, endpoint, admin_only, active) in SEED_MODULES {
        if let Err(e) = module::ensure_module(pool, key, label, endpoint, admin_only, active).await
        {
            tracing::warn!("Module reconciliation failed for '{key}': {e}");
        }
    }

    match user::list_all(pool).await {
        Ok(users) => {
            for u in users.iter().filter(|u| u.is_admin) {
                if let Err(e) = user::grant_all_modules(pool, u.id).await {
                    tracing::warn!("Granting modules to admin '{}' failed: {e}", u.username);
                }
            }
        }
        Err(e) => tracing::warn!("Admin module grant pass skipped: {e}"),
    }
}

/// First-run seeding: a default admin (PIN 0000) when the user table is
/// empty, and the default site list when no sites exist.
pub async fn bootstrap(pool: &SqlitePool, pin_pepper: &str) -> RepoResult<()> {
    if user::list_all(pool).await?.is_empty() {
        let admin = user::create(pool, "admin", &pin_index(pin_pepper, DEFAULT_ADMIN_PIN), true)
            .await?;
        user::grant_all_modules(pool, admin.id).await?;
        tracing::info!("Created default admin user (PIN {DEFAULT_ADMIN_PIN} — change it)");
    }

    if site::list_all(pool).await?.is_empty() {
        for name in DEFAULT_SITES {
            site::create(
                pool,
                &shared::models::FarmSiteCreate {
                    name: (*name).to_string(),
                    active: true,
                    hens_start: 0,
                    hens_adjust: 0,
                },
            )
            .await?;
        }
        tracing::info!("Seeded {} default sites", DEFAULT_SITES.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn reconcile_seeds_the_catalog_and_is_idempotent() {
        let pool = test_pool().await;
        reconcile(&pool).await;
        let first = module::list_all(&pool).await.unwrap();
        assert_eq!(first.len(), SEED_MODULES.len());

        reconcile(&pool).await;
        assert_eq!(module::list_all(&pool).await.unwrap().len(), first.len());
    }

    #[tokio::test]
    async fn bootstrap_creates_admin_and_sites_once() {
        let pool = test_pool().await;
        reconcile(&pool).await;
        bootstrap(&pool, "pepper").await.unwrap();

        let users = user::list_all(&pool).await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].is_admin);
        assert_eq!(users[0].username, "admin");
        // Default admin logs in with PIN 0000
        let found = user::find_by_pin_index(&pool, &pin_index("pepper", "0000"))
            .await
            .unwrap();
        assert!(found.is_some());
        // Admin holds the full catalog
        assert_eq!(
            user::module_ids_for_user(&pool, users[0].id).await.unwrap().len(),
            SEED_MODULES.len()
        );

        assert_eq!(site::list_all(&pool).await.unwrap().len(), DEFAULT_SITES.len());

        // Second run seeds nothing new
        bootstrap(&pool, "pepper").await.unwrap();
        assert_eq!(user::list_all(&pool).await.unwrap().len(), 1);
        assert_eq!(site::list_all(&pool).await.unwrap().len(), DEFAULT_SITES.len());
    }

    #[tokio::test]
    async fn reconcile_grants_new_modules_to_existing_admins() {
        let pool = test_pool().await;
        bootstrap(&pool, "pepper").await.unwrap();
        // Bootstrap ran before any modules existed
        let admin = &user::list_all(&pool).await.unwrap()[0];
        assert!(user::module_ids_for_user(&pool, admin.id).await.unwrap().is_empty());

        reconcile(&pool).await;
        assert_eq!(
            user::module_ids_for_user(&pool, admin.id).await.unwrap().len(),
            SEED_MODULES.len()
        );
    }
}
