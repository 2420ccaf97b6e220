use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job_match::JobMatchRow;

/// Parameters for persisting a freshly scored job match.
pub struct NewJobMatch<'a> {
    pub resume_id: Uuid,
    pub job_description: &'a str,
    pub job_role: Option<&'a str>,
    pub job_location: Option<&'a str>,
    pub alignment_score: i32,
    pub alignment_rationale: &'a str,
    pub gaps: &'a Value,
    pub strengths: &'a Value,
    pub recommendations: &'a Value,
}

/// Inserts a job match with its alignment columns populated and the later
/// stage columns NULL.
pub async fn create_job_match(
    pool: &PgPool,
    new: NewJobMatch<'_>,
) -> Result<JobMatchRow, sqlx::Error> {
    sqlx::query_as::<_, JobMatchRow>(
        r#"
        INSERT INTO job_matches
            (id, resume_id, job_description, job_role, job_location,
             alignment_score, alignment_rationale, gaps, strengths, recommendations)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.resume_id)
    .bind(new.job_description)
    .bind(new.job_role)
    .bind(new.job_location)
    .bind(new.alignment_score)
    .bind(new.alignment_rationale)
    .bind(new.gaps)
    .bind(new.strengths)
    .bind(new.recommendations)
    .fetch_one(pool)
    .await
}

pub async fn get_job_match(pool: &PgPool, id: Uuid) -> Result<Option<JobMatchRow>, sqlx::Error> {
    sqlx::query_as::<_, JobMatchRow>("SELECT * FROM job_matches WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Attaches gap responses and the verdict in one write. Resubmission
/// overwrites the previous outcome, so any tailored resume derived from
/// the old responses is cleared in the same statement.
pub async fn set_gap_outcome(
    pool: &PgPool,
    id: Uuid,
    gap_responses: &Value,
    final_verdict: &str,
    should_apply: bool,
) -> Result<Option<JobMatchRow>, sqlx::Error> {
    sqlx::query_as::<_, JobMatchRow>(
        r#"
        UPDATE job_matches
        SET gap_responses = $2,
            final_verdict = $3,
            should_apply = $4,
            changes_summary = NULL,
            tailored_resume_content = NULL
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(gap_responses)
    .bind(final_verdict)
    .bind(should_apply)
    .fetch_optional(pool)
    .await
}

/// Attaches the tailored resume halves in one write.
pub async fn set_tailored_resume(
    pool: &PgPool,
    id: Uuid,
    changes_summary: &str,
    resume_body: &str,
) -> Result<Option<JobMatchRow>, sqlx::Error> {
    sqlx::query_as::<_, JobMatchRow>(
        r#"
        UPDATE job_matches
        SET changes_summary = $2,
            tailored_resume_content = $3
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes_summary)
    .bind(resume_body)
    .fetch_optional(pool)
    .await
}
