//! Livestock Event Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of livestock event recorded against a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LivestockEventKind {
    Feeding,
    Watering,
    Cleaning,
    Relocation,
    Loss,
    Note,
}

impl LivestockEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LivestockEventKind::Feeding => "feeding",
            LivestockEventKind::Watering => "watering",
            LivestockEventKind::Cleaning => "cleaning",
            LivestockEventKind::Relocation => "relocation",
            LivestockEventKind::Loss => "loss",
            LivestockEventKind::Note => "note",
        }
    }
}

/// A dated event at one site. `quantity` is only meaningful for losses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LivestockEvent {
    pub id: i64,
    pub site_id: i64,
    pub event_date: NaiveDate,
    pub kind: LivestockEventKind,
    pub quantity: Option<i64>,
    pub note: Option<String>,
    pub created_at: i64,
}

/// Record event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivestockEventCreate {
    pub kind: LivestockEventKind,
    pub quantity: Option<i64>,
    pub note: Option<String>,
}

/// Per-site overview card (headcount, recent production, last events)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteOverview {
    pub site: super::FarmSite,
    /// hens_start + hens_adjust - booked losses
    pub headcount: i64,
    /// Production booked for this site over the trailing 7 days
    pub eggs_last7: i64,
    /// Rough lay rate percentage: 100 * eggs7 / (headcount * 7)
    pub lay_rate: Option<f64>,
    pub last_feeding: Option<NaiveDate>,
    pub last_watering: Option<NaiveDate>,
    pub last_cleaning: Option<NaiveDate>,
    pub last_relocation: Option<NaiveDate>,
}
