use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::ResumeRow;

/// Parameters for persisting a freshly extracted upload.
pub struct NewResume<'a> {
    pub user_id: Uuid,
    pub filename: &'a str,
    pub filesize: i64,
    pub mime_type: &'a str,
    pub extracted_text: &'a str,
}

/// Inserts a resume and returns the stored row.
pub async fn create_resume(pool: &PgPool, new: NewResume<'_>) -> Result<ResumeRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, filename, filesize, mime_type, extracted_text)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(new.filename)
    .bind(new.filesize)
    .bind(new.mime_type)
    .bind(new.extracted_text)
    .fetch_one(pool)
    .await
}

pub async fn get_resume(pool: &PgPool, id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns all resumes for a user, newest first.
pub async fn list_resumes_for_owner(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Returns the newest resume for a user: the default working resume for
/// matches and roadmaps that do not name one.
pub async fn latest_resume_for_owner(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
