//! Subscription Model
//!
//! A subscription is a recurring weekly commitment: a household picks up a
//! fixed quantity of eggs on a fixed weekday. Weekday numbering is
//! ISO-style: 0 = Monday .. 6 = Sunday.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Subscription entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Subscription {
    pub id: i64,
    /// Customer / household name
    pub name: String,
    /// Eggs per delivery
    pub quantity: i64,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: i64,
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Create subscription payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionCreate {
    pub name: String,
    pub quantity: i64,
    pub weekday: i64,
    #[serde(default = "default_active")]
    pub active: bool,
    pub notes: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Update subscription payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub weekday: Option<i64>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

/// What to do with one scheduled pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ExceptionAction {
    /// Skip this week's pickup entirely
    Skip,
    /// Move this week's pickup to `new_date`
    Shift,
}

/// A one-off exception to a subscription's schedule.
///
/// Invariant: `new_date` is set if and only if `action == Shift`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SubscriptionException {
    pub id: i64,
    pub subscription_id: i64,
    /// The originally scheduled pickup date
    pub original_date: NaiveDate,
    pub action: ExceptionAction,
    pub new_date: Option<NaiveDate>,
    pub created_at: i64,
}
