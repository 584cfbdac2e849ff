//! Task and Timesheet Models

use serde::{Deserialize, Serialize};

/// A farm task, optionally assigned and optionally recurring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Assigned user, if any
    pub assignee_id: Option<i64>,
    /// Recurrence hint ("weekly", "monthly", ...); None = one-off
    pub interval: Option<String>,
    pub done: bool,
    pub created_at: i64,
}

/// Create task payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<i64>,
    pub interval: Option<String>,
}

/// Update task payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<i64>,
    pub interval: Option<String>,
    pub done: Option<bool>,
}

/// One clock-in/clock-out span. `clock_out` is None while the span is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimeEntry {
    pub id: i64,
    pub user_id: i64,
    /// Clock-in timestamp (millis)
    pub clock_in: i64,
    /// Clock-out timestamp (millis), None while open
    pub clock_out: Option<i64>,
}

/// Total worked hours for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSummary {
    pub user_id: i64,
    pub username: String,
    /// Sum of closed spans, in hours, rounded to 2 decimals
    pub total_hours: f64,
}
