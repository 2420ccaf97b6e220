use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One job match. Created with the alignment columns populated; the
/// gap-assessment columns and the tailored-resume columns are filled by
/// the two later stages, each in a single write.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_description: String,
    pub job_role: Option<String>,
    pub job_location: Option<String>,
    pub alignment_score: i32,
    pub alignment_rationale: String,
    pub gaps: Value,
    pub strengths: Value,
    pub recommendations: Value,
    pub gap_responses: Option<Value>,
    pub final_verdict: Option<String>,
    pub should_apply: Option<bool>,
    pub changes_summary: Option<String>,
    pub tailored_resume_content: Option<String>,
    pub created_at: DateTime<Utc>,
}
