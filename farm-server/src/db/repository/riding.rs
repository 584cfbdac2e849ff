//! Riding Lesson Repository

use super::{RepoError, RepoResult};
use shared::models::{RidingLesson, RidingLessonCreate};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, lesson_type, lesson_date, duration_minutes, horse, instructor_id, created_at";

/// Plan a lesson.
pub async fn schedule(pool: &SqlitePool, payload: &RidingLessonCreate) -> RepoResult<RidingLesson> {
    let lesson_type = payload.lesson_type.trim();
    if lesson_type.is_empty() {
        return Err(RepoError::Validation("lesson_type must not be empty".into()));
    }
    if payload.duration_minutes <= 0 {
        return Err(RepoError::Validation("duration must be positive".into()));
    }
    if let Some(instructor_id) = payload.instructor_id
        && crate::db::repository::user::find_by_id(pool, instructor_id)
            .await?
            .is_none()
    {
        return Err(RepoError::NotFound(format!(
            "Instructor not found: {instructor_id}"
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO riding_lesson (id, lesson_type, lesson_date, duration_minutes, horse, instructor_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(lesson_type)
    .bind(payload.lesson_date)
    .bind(payload.duration_minutes)
    .bind(payload.horse.as_deref())
    .bind(payload.instructor_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Lesson not found: {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM riding_lesson WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Lesson not found: {id}")));
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<RidingLesson>> {
    let lesson = sqlx::query_as::<_, RidingLesson>(&format!(
        "SELECT {COLUMNS} FROM riding_lesson WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(lesson)
}

/// The lesson plan, earliest date first.
pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<RidingLesson>> {
    let lessons = sqlx::query_as::<_, RidingLesson>(&format!(
        "SELECT {COLUMNS} FROM riding_lesson ORDER BY lesson_date, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(lessons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn lesson(lesson_type: &str, date: &str, minutes: i64) -> RidingLessonCreate {
        RidingLessonCreate {
            lesson_type: lesson_type.to_string(),
            lesson_date: d(date),
            duration_minutes: minutes,
            horse: None,
            instructor_id: None,
        }
    }

    #[tokio::test]
    async fn plan_is_listed_by_date() {
        let pool = test_pool().await;
        schedule(&pool, &lesson("Dressage", "2025-03-10", 45)).await.unwrap();
        schedule(&pool, &lesson("Beginners", "2025-03-08", 30)).await.unwrap();

        let types: Vec<String> = list_all(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.lesson_type)
            .collect();
        assert_eq!(types, vec!["Beginners", "Dressage"]);
    }

    #[tokio::test]
    async fn schedule_validates_type_and_duration() {
        let pool = test_pool().await;
        assert!(matches!(
            schedule(&pool, &lesson("  ", "2025-03-10", 45)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            schedule(&pool, &lesson("Dressage", "2025-03-10", 0)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn unknown_instructor_is_rejected() {
        let pool = test_pool().await;
        let mut payload = lesson("Dressage", "2025-03-10", 45);
        payload.instructor_id = Some(999);

        assert!(matches!(
            schedule(&pool, &payload).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn instructor_is_kept_when_known() {
        let pool = test_pool().await;
        let anna = crate::db::repository::user::create(&pool, "anna", "digest-1", false)
            .await
            .unwrap();

        let mut payload = lesson("Dressage", "2025-03-10", 45);
        payload.instructor_id = Some(anna.id);
        payload.horse = Some("Luna".into());
        let planned = schedule(&pool, &payload).await.unwrap();
        assert_eq!(planned.instructor_id, Some(anna.id));
        assert_eq!(planned.horse.as_deref(), Some("Luna"));
    }

    #[tokio::test]
    async fn deleting_a_missing_lesson_is_not_found() {
        let pool = test_pool().await;
        let planned = schedule(&pool, &lesson("Dressage", "2025-03-10", 45)).await.unwrap();
        delete(&pool, planned.id).await.unwrap();

        assert!(matches!(
            delete(&pool, planned.id).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }
}
