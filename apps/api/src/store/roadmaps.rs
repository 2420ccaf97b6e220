use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::roadmap::CareerRoadmapRow;

/// Parameters for persisting a generated roadmap.
pub struct NewRoadmap<'a> {
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub dream_role: &'a str,
    pub dream_location: &'a str,
    pub timeframe: &'a str,
    pub current_gaps: &'a Value,
    pub skills_to_acquire: &'a Value,
    pub action_plan: &'a Value,
    pub resources: &'a Value,
    pub milestones: &'a Value,
}

pub async fn create_roadmap(
    pool: &PgPool,
    new: NewRoadmap<'_>,
) -> Result<CareerRoadmapRow, sqlx::Error> {
    sqlx::query_as::<_, CareerRoadmapRow>(
        r#"
        INSERT INTO career_roadmaps
            (id, user_id, resume_id, dream_role, dream_location, timeframe,
             current_gaps, skills_to_acquire, action_plan, resources, milestones)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(new.resume_id)
    .bind(new.dream_role)
    .bind(new.dream_location)
    .bind(new.timeframe)
    .bind(new.current_gaps)
    .bind(new.skills_to_acquire)
    .bind(new.action_plan)
    .bind(new.resources)
    .bind(new.milestones)
    .fetch_one(pool)
    .await
}

pub async fn get_roadmap(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<CareerRoadmapRow>, sqlx::Error> {
    sqlx::query_as::<_, CareerRoadmapRow>("SELECT * FROM career_roadmaps WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns all roadmaps for a user, newest first.
pub async fn list_roadmaps_for_owner(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CareerRoadmapRow>, sqlx::Error> {
    sqlx::query_as::<_, CareerRoadmapRow>(
        "SELECT * FROM career_roadmaps WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
