use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One career roadmap. The five JSON columns hold the normalized payload
/// produced by the planner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CareerRoadmapRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub dream_role: String,
    pub dream_location: String,
    pub timeframe: String,
    pub current_gaps: Value,
    pub skills_to_acquire: Value,
    pub action_plan: Value,
    pub resources: Value,
    pub milestones: Value,
    pub created_at: DateTime<Utc>,
}
