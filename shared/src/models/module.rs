//! Feature Module Model
//!
//! A module is a named feature area subject to per-user access control.
//! The source of truth for the catalog is the code-declared seed list;
//! the DB row is a reconciled cache of that declaration.

use serde::{Deserialize, Serialize};

/// Feature module entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Module {
    pub id: i64,
    /// Unique slug, e.g. "eggs", "subscribers"
    pub key: String,
    /// Display name. Never reconciled after creation — operators may
    /// customize it.
    pub label: String,
    /// Opaque routing identifier understood by the frontend router
    pub endpoint: String,
    pub active: bool,
    pub admin_only: bool,
}
