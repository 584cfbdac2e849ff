//! Egg Ledger Model
//!
//! The ledger is an append-only record of inventory movements. The current
//! stock is never stored; it is always derived as
//! `sum(production) - sum(disposal)`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a ledger movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum MovementKind {
    Production,
    Disposal,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Production => "production",
            MovementKind::Disposal => "disposal",
        }
    }
}

/// A single dated quantity movement. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub id: i64,
    /// Calendar day of the movement (ISO date)
    pub entry_date: NaiveDate,
    /// Wall-clock time "HH:MM", informational only
    pub time_of_day: Option<String>,
    pub kind: MovementKind,
    /// Always positive; the kind carries the sign
    pub quantity: i64,
    /// Username of the operator who booked the movement
    pub actor: Option<String>,
    /// Free-text description, e.g. "Production Mobile 1"
    pub label: Option<String>,
    /// Originating site, when the movement came from one.
    /// Replaces the old label-substring attribution heuristic.
    pub site_id: Option<i64>,
    pub created_at: i64,
}

/// Per-day production/disposal totals (dense series, zero-filled)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub production: i64,
    pub disposal: i64,
}

impl DayTotals {
    pub fn net(&self) -> i64 {
        self.production - self.disposal
    }
}

/// Production/disposal sums over some period
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub production: i64,
    pub disposal: i64,
    pub net: i64,
}

/// Why stock left the ledger outside of subscription deliveries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisposalReason {
    Sale,
    Loss,
    Restaurant,
    OwnUse,
}

impl DisposalReason {
    /// Display label used in ledger entry descriptions
    pub fn label(&self) -> &'static str {
        match self {
            DisposalReason::Sale => "Sale",
            DisposalReason::Loss => "Loss",
            DisposalReason::Restaurant => "Restaurant",
            DisposalReason::OwnUse => "Own use",
        }
    }
}
