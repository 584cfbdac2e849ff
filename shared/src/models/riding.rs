//! Riding Lesson Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A planned riding lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RidingLesson {
    pub id: i64,
    /// Free-form kind of lesson (beginner group, dressage, ...)
    pub lesson_type: String,
    pub lesson_date: NaiveDate,
    pub duration_minutes: i64,
    pub horse: Option<String>,
    /// Staff member giving the lesson
    pub instructor_id: Option<i64>,
    pub created_at: i64,
}

/// Plan lesson payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidingLessonCreate {
    pub lesson_type: String,
    pub lesson_date: NaiveDate,
    pub duration_minutes: i64,
    pub horse: Option<String>,
    pub instructor_id: Option<i64>,
}
