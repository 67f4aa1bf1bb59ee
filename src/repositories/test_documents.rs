use std::collections::HashMap;

use sqlx::PgPool;

use crate::db::models::TestDocument;

const COLUMNS: &str = "\
    id, title, course_id, kind, sections, phase1_minutes, phase2_minutes, duration_minutes, \
    show_answer_key, is_approved, is_active, parent_test_id, chunk_index, total_chunks, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<TestDocument>, sqlx::Error> {
    sqlx::query_as::<_, TestDocument>(&format!("SELECT {COLUMNS} FROM tests WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_children(
    pool: &PgPool,
    root_id: &str,
) -> Result<Vec<TestDocument>, sqlx::Error> {
    sqlx::query_as::<_, TestDocument>(&format!(
        "SELECT {COLUMNS} FROM tests WHERE parent_test_id = $1 ORDER BY created_at, id"
    ))
    .bind(root_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn answer_key_flags(
    pool: &PgPool,
    ids: &[String],
) -> Result<HashMap<String, bool>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, (String, bool)>(
        "SELECT id, show_answer_key FROM tests WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}
