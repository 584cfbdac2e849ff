//! Farm Site Model (mobile coops)

use serde::{Deserialize, Serialize};

/// A physical sub-unit of the farm — in practice a mobile chicken coop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FarmSite {
    pub id: i64,
    pub name: String,
    pub active: bool,
    /// Headcount when the site was stocked
    pub hens_start: i64,
    /// Manual correction applied on top of `hens_start` (default 0)
    pub hens_adjust: i64,
    pub created_at: i64,
}

/// Create site payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmSiteCreate {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub hens_start: i64,
    #[serde(default)]
    pub hens_adjust: i64,
}

fn default_active() -> bool {
    true
}

/// Update site payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmSiteUpdate {
    pub name: Option<String>,
    pub active: Option<bool>,
    pub hens_start: Option<i64>,
    pub hens_adjust: Option<i64>,
}
