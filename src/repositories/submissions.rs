use sqlx::PgPool;

use crate::db::models::Submission;

const COLUMNS: &str = "\
    id, test_group_id, test_id, student_id, answers, section_results, total_score, \
    total_max_score, percentage, submitted_at, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!("SELECT {COLUMNS} FROM submissions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_group_and_student(
    pool: &PgPool,
    test_group_id: &str,
    student_id: &str,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions WHERE test_group_id = $1 AND student_id = $2"
    ))
    .bind(test_group_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_student(
    pool: &PgPool,
    student_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions
         WHERE student_id = $1
         ORDER BY submitted_at DESC, id
         OFFSET $2 LIMIT $3"
    ))
    .bind(student_id)
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_by_student(pool: &PgPool, student_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions WHERE student_id = $1")
        .bind(student_id)
        .fetch_one(pool)
        .await
}

/// Returns `None` when a submission for the same group and student already exists.
pub(crate) async fn create(
    pool: &PgPool,
    record: &Submission,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (
            id, test_group_id, test_id, student_id, answers, section_results,
            total_score, total_max_score, percentage, submitted_at, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
        ON CONFLICT (test_group_id, student_id) DO NOTHING
        RETURNING {COLUMNS}",
    ))
    .bind(&record.id)
    .bind(&record.test_group_id)
    .bind(&record.test_id)
    .bind(&record.student_id)
    .bind(&record.answers)
    .bind(&record.section_results)
    .bind(record.total_score)
    .bind(record.total_max_score)
    .bind(record.percentage)
    .bind(record.submitted_at)
    .bind(record.created_at)
    .fetch_optional(pool)
    .await
}
