use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::roadmap::CareerRoadmapRow;
use crate::resumes::handlers::{resume_owned_by, UserIdQuery};
use crate::state::AppState;
use crate::store;

use super::planner::{run_roadmap, Timeframe};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoadmapRequest {
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub dream_role: String,
    pub dream_location: String,
    pub timeframe: Timeframe,
}

/// POST /api/v1/roadmaps
///
/// Without a `resumeId` the owner's newest upload is the starting point.
pub async fn handle_create_roadmap(
    State(state): State<AppState>,
    Json(req): Json<CreateRoadmapRequest>,
) -> Result<Json<CareerRoadmapRow>, AppError> {
    let dream_role = req.dream_role.trim();
    let dream_location = req.dream_location.trim();
    if dream_role.is_empty() || dream_location.is_empty() {
        return Err(AppError::Validation(
            "Provide dreamRole and dreamLocation".to_string(),
        ));
    }

    let resume = match req.resume_id {
        Some(resume_id) => resume_owned_by(&state.db, resume_id, req.user_id).await?,
        None => store::resumes::latest_resume_for_owner(&state.db, req.user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No resume found. Please upload a resume first.".to_string())
            })?,
    };

    info!(
        "Generating {} roadmap toward {dream_role} for user {}",
        req.timeframe.as_str(),
        req.user_id
    );
    let plan = run_roadmap(
        state.llm.as_ref(),
        &resume.extracted_text,
        dream_role,
        dream_location,
        req.timeframe,
    )
    .await?;

    let current_gaps =
        serde_json::to_value(&plan.current_gaps).map_err(|e| AppError::Internal(e.into()))?;
    let skills_to_acquire =
        serde_json::to_value(&plan.skills_to_acquire).map_err(|e| AppError::Internal(e.into()))?;
    let action_plan =
        serde_json::to_value(&plan.action_plan).map_err(|e| AppError::Internal(e.into()))?;
    let resources =
        serde_json::to_value(&plan.resources).map_err(|e| AppError::Internal(e.into()))?;
    let milestones =
        serde_json::to_value(&plan.milestones).map_err(|e| AppError::Internal(e.into()))?;

    let row = store::roadmaps::create_roadmap(
        &state.db,
        store::roadmaps::NewRoadmap {
            user_id: req.user_id,
            resume_id: resume.id,
            dream_role,
            dream_location,
            timeframe: req.timeframe.as_str(),
            current_gaps: &current_gaps,
            skills_to_acquire: &skills_to_acquire,
            action_plan: &action_plan,
            resources: &resources,
            milestones: &milestones,
        },
    )
    .await?;

    Ok(Json(row))
}

/// GET /api/v1/roadmaps
pub async fn handle_list_roadmaps(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<CareerRoadmapRow>>, AppError> {
    let roadmaps = store::roadmaps::list_roadmaps_for_owner(&state.db, params.user_id).await?;
    Ok(Json(roadmaps))
}

/// GET /api/v1/roadmaps/:id
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<CareerRoadmapRow>, AppError> {
    let roadmap = store::roadmaps::get_roadmap(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Roadmap {id} not found")))?;
    if roadmap.user_id != params.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(Json(roadmap))
}
