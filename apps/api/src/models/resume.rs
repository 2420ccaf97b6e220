use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One uploaded resume. Immutable after creation; the newest row per user
/// is the default working resume for the downstream stages.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub filesize: i64,
    pub mime_type: String,
    pub extracted_text: String,
    pub created_at: DateTime<Utc>,
}
