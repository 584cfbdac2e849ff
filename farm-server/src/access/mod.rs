//! Access Control
//!
//! Decides which feature modules a user may see. The decision itself is a
//! pure function over the user's profile and a module row; the database
//! only supplies the inputs.

pub mod registry;

use crate::db::repository::{RepoResult, module, user};
use shared::models::Module;
use sqlx::SqlitePool;

/// The slice of a user that access decisions depend on.
#[derive(Debug, Clone)]
pub struct AccessProfile {
    pub is_admin: bool,
    /// Explicitly granted module IDs. Empty means "no memberships
    /// recorded" — see [`can_access`] for why that is not a lock-out.
    pub module_ids: Vec<i64>,
}

impl AccessProfile {
    pub async fn load(pool: &SqlitePool, user_id: i64, is_admin: bool) -> RepoResult<Self> {
        let module_ids = user::module_ids_for_user(pool, user_id).await?;
        Ok(Self {
            is_admin,
            module_ids,
        })
    }
}

/// Whether a user may see a module.
///
/// The rules apply strictly in this order:
/// 1. an inactive module is invisible, even to admins;
/// 2. admins see every active module;
/// 3. admin-only modules are invisible to everyone else;
/// 4. a user with recorded memberships sees exactly those modules;
/// 5. a user with no memberships at all sees everything that survived 1-3.
///
/// Step 5 is deliberate: a freshly created user with no grants yet gets the
/// full non-admin catalog instead of a blank screen.
pub fn can_access(profile: &AccessProfile, module: &Module) -> bool {
    if !module.active {
        return false;
    }
    if profile.is_admin {
        return true;
    }
    if module.admin_only {
        return false;
    }
    if !profile.module_ids.is_empty() {
        return profile.module_ids.contains(&module.id);
    }
    true
}

/// All modules the user may see, ordered by label.
pub async fn visible_modules(
    pool: &SqlitePool,
    user_id: i64,
    is_admin: bool,
) -> RepoResult<Vec<Module>> {
    let profile = AccessProfile::load(pool, user_id, is_admin).await?;
    let mut visible: Vec<Module> = module::list_all(pool)
        .await?
        .into_iter()
        .filter(|m| can_access(&profile, m))
        .collect();
    visible.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(visible)
}
