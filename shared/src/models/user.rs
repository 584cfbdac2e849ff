//! User Model

use serde::{Deserialize, Serialize};

/// User entity
///
/// `pin_index` is a peppered SHA-256 digest of the login PIN — the raw PIN
/// is never stored. The field is skipped on serialization so it cannot leak
/// through API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub pin_index: String,
    pub is_admin: bool,
    pub created_at: i64,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    /// Raw 4-digit PIN, hashed before storage
    pub pin: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Replace a user's module memberships
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserModulesUpdate {
    pub module_ids: Vec<i64>,
}

/// User plus resolved module memberships (admin listing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithModules {
    #[serde(flatten)]
    pub user: User,
    /// Module IDs explicitly granted. Empty means "no memberships
    /// recorded", which the access resolver treats as open-by-default.
    pub module_ids: Vec<i64>,
}
