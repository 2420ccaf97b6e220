use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One completed resume analysis. `section_scores` and `suggestions` hold
/// the normalized JSON payloads produced by the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub completeness_score: i32,
    pub completeness_rationale: String,
    pub section_scores: Value,
    pub suggestions: Value,
    pub created_at: DateTime<Utc>,
}
