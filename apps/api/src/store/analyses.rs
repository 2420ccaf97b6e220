use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::analysis::AnalysisRow;

/// Parameters for persisting a completed analysis.
pub struct NewAnalysis<'a> {
    pub resume_id: Uuid,
    pub completeness_score: i32,
    pub completeness_rationale: &'a str,
    pub section_scores: &'a Value,
    pub suggestions: &'a Value,
}

/// Inserts an analysis and returns the stored row. Every analyze request
/// creates a new row; prior analyses of the same resume are kept.
pub async fn create_analysis(
    pool: &PgPool,
    new: NewAnalysis<'_>,
) -> Result<AnalysisRow, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRow>(
        r#"
        INSERT INTO analyses
            (id, resume_id, completeness_score, completeness_rationale,
             section_scores, suggestions)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.resume_id)
    .bind(new.completeness_score)
    .bind(new.completeness_rationale)
    .bind(new.section_scores)
    .bind(new.suggestions)
    .fetch_one(pool)
    .await
}

pub async fn get_analysis(pool: &PgPool, id: Uuid) -> Result<Option<AnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRow>("SELECT * FROM analyses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns the most recent analysis of a resume, if any.
pub async fn latest_analysis_for_resume(
    pool: &PgPool,
    resume_id: Uuid,
) -> Result<Option<AnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRow>(
        "SELECT * FROM analyses WHERE resume_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(resume_id)
    .fetch_optional(pool)
    .await
}
