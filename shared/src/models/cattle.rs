//! Cattle Registry Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One animal in the herd register
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cattle {
    pub id: i64,
    pub name: String,
    /// Official ear tag number, unique per animal
    pub ear_tag: String,
    pub birth_date: NaiveDate,
    pub breed: Option<String>,
    pub created_at: i64,
}

/// Herd intake payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CattleCreate {
    pub name: String,
    pub ear_tag: String,
    pub birth_date: NaiveDate,
    pub breed: Option<String>,
}

/// Partial master-data update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CattleUpdate {
    pub name: Option<String>,
    pub ear_tag: Option<String>,
    pub breed: Option<String>,
}

/// Kind of health or breeding entry in an animal's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum CattleEventKind {
    Vaccination,
    Medication,
    Insemination,
}

impl CattleEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CattleEventKind::Vaccination => "vaccination",
            CattleEventKind::Medication => "medication",
            CattleEventKind::Insemination => "insemination",
        }
    }
}

/// A dated history entry for one animal.
///
/// `label` carries the vaccine type, medication name or sire depending on
/// the kind; `dose` is only meaningful for medications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CattleEvent {
    pub id: i64,
    pub cattle_id: i64,
    pub event_date: NaiveDate,
    pub kind: CattleEventKind,
    pub label: Option<String>,
    pub dose: Option<String>,
    pub created_at: i64,
}

/// Record history entry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CattleEventCreate {
    pub kind: CattleEventKind,
    pub label: Option<String>,
    pub dose: Option<String>,
}

/// Herd book row: an animal together with its full history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HerdBookEntry {
    #[serde(flatten)]
    pub cattle: Cattle,
    pub events: Vec<CattleEvent>,
}
