use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

// Statements are executed one at a time; sqlx prepared queries do not accept
// multi-statement strings.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS resumes (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        filename TEXT NOT NULL,
        filesize BIGINT NOT NULL,
        mime_type TEXT NOT NULL,
        extracted_text TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_resumes_user ON resumes (user_id, created_at DESC)",
    "CREATE TABLE IF NOT EXISTS analyses (
        id UUID PRIMARY KEY,
        resume_id UUID NOT NULL REFERENCES resumes(id),
        completeness_score INT NOT NULL,
        completeness_rationale TEXT NOT NULL,
        section_scores JSONB NOT NULL,
        suggestions JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_analyses_resume ON analyses (resume_id, created_at DESC)",
    "CREATE TABLE IF NOT EXISTS job_matches (
        id UUID PRIMARY KEY,
        resume_id UUID NOT NULL REFERENCES resumes(id),
        job_description TEXT NOT NULL,
        job_role TEXT,
        job_location TEXT,
        alignment_score INT NOT NULL,
        alignment_rationale TEXT NOT NULL,
        gaps JSONB NOT NULL,
        strengths JSONB NOT NULL,
        recommendations JSONB NOT NULL,
        gap_responses JSONB,
        final_verdict TEXT,
        should_apply BOOLEAN,
        changes_summary TEXT,
        tailored_resume_content TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_job_matches_resume ON job_matches (resume_id, created_at DESC)",
    "CREATE TABLE IF NOT EXISTS career_roadmaps (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        resume_id UUID NOT NULL REFERENCES resumes(id),
        dream_role TEXT NOT NULL,
        dream_location TEXT NOT NULL,
        timeframe TEXT NOT NULL,
        current_gaps JSONB NOT NULL,
        skills_to_acquire JSONB NOT NULL,
        action_plan JSONB NOT NULL,
        resources JSONB NOT NULL,
        milestones JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_roadmaps_user ON career_roadmaps (user_id, created_at DESC)",
];

/// Creates any missing tables and indexes at startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema ensured");
    Ok(())
}
