use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::resumes::handlers::{resume_owned_by, UserIdQuery};
use crate::state::AppState;
use crate::store;

use super::analyzer::run_analysis;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/resumes/:id/analyze
///
/// Analysis is stateless: every request produces a new row, so a user can
/// re-analyze after editing and re-uploading.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisRow>, AppError> {
    let resume = resume_owned_by(&state.db, id, req.user_id).await?;

    info!("Analyzing resume {id} for user {}", req.user_id);
    let analysis = run_analysis(state.llm.as_ref(), &resume.extracted_text).await?;

    let section_scores =
        serde_json::to_value(&analysis.section_scores).map_err(|e| AppError::Internal(e.into()))?;
    let suggestions =
        serde_json::to_value(&analysis.suggestions).map_err(|e| AppError::Internal(e.into()))?;

    let row = store::analyses::create_analysis(
        &state.db,
        store::analyses::NewAnalysis {
            resume_id: resume.id,
            completeness_score: analysis.completeness_score,
            completeness_rationale: &analysis.completeness_rationale,
            section_scores: &section_scores,
            suggestions: &suggestions,
        },
    )
    .await?;

    Ok(Json(row))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AnalysisRow>, AppError> {
    let analysis = store::analyses::get_analysis(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    resume_owned_by(&state.db, analysis.resume_id, params.user_id).await?;
    Ok(Json(analysis))
}

/// GET /api/v1/resumes/:id/analysis
pub async fn handle_latest_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AnalysisRow>, AppError> {
    let resume = resume_owned_by(&state.db, id, params.user_id).await?;
    let analysis = store::analyses::latest_analysis_for_resume(&state.db, resume.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No analysis found for resume {id}")))?;
    Ok(Json(analysis))
}
