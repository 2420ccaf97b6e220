use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_match::JobMatchRow;
use crate::resumes::handlers::{resume_owned_by, UserIdQuery};
use crate::state::AppState;
use crate::store;

use super::assessment::{
    ensure_tailoring_allowed, run_final_verdict, validate_gap_responses, GapResponse, MatchStage,
    VerdictOutcome,
};
use super::matcher::{run_job_match, synthesize_job_description, Gap};
use super::tailoring::run_tailoring;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub job_description: Option<String>,
    pub job_role: Option<String>,
    pub job_location: Option<String>,
}

/// A match row plus its derived stage.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchResponse {
    #[serde(flatten)]
    pub job_match: JobMatchRow,
    pub stage: MatchStage,
}

impl From<JobMatchRow> for JobMatchResponse {
    fn from(row: JobMatchRow) -> Self {
        JobMatchResponse {
            stage: MatchStage::of(&row),
            job_match: row,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoredResumeResponse {
    pub changes_summary: String,
    pub resume_content: String,
}

/// POST /api/v1/matches
///
/// The job description comes either verbatim from the request or, in
/// curated mode, is synthesized from a role and location first. Without a
/// `resumeId` the owner's newest upload is matched.
pub async fn handle_create_match(
    State(state): State<AppState>,
    Json(req): Json<CreateMatchRequest>,
) -> Result<Json<JobMatchRow>, AppError> {
    let resume = match req.resume_id {
        Some(resume_id) => resume_owned_by(&state.db, resume_id, req.user_id).await?,
        None => store::resumes::latest_resume_for_owner(&state.db, req.user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No resume found. Please upload a resume first.".to_string())
            })?,
    };

    let supplied_jd = req
        .job_description
        .as_deref()
        .map(str::trim)
        .filter(|jd| !jd.is_empty());
    let (job_description, job_role, job_location) = match supplied_jd {
        Some(jd) => (jd.to_string(), None, None),
        None => match (req.job_role.as_deref(), req.job_location.as_deref()) {
            (Some(role), Some(location))
                if !role.trim().is_empty() && !location.trim().is_empty() =>
            {
                info!("Synthesizing job description for {role} in {location}");
                let jd = synthesize_job_description(state.llm.as_ref(), role, location).await?;
                (jd, Some(role.to_string()), Some(location.to_string()))
            }
            _ => {
                return Err(AppError::Validation(
                    "Provide either jobDescription or both jobRole and jobLocation".to_string(),
                ))
            }
        },
    };

    info!("Matching resume {} for user {}", resume.id, req.user_id);
    let report = run_job_match(state.llm.as_ref(), &resume.extracted_text, &job_description).await?;

    let gaps = serde_json::to_value(&report.gaps).map_err(|e| AppError::Internal(e.into()))?;
    let strengths =
        serde_json::to_value(&report.strengths).map_err(|e| AppError::Internal(e.into()))?;
    let recommendations =
        serde_json::to_value(&report.recommendations).map_err(|e| AppError::Internal(e.into()))?;

    let row = store::matches::create_job_match(
        &state.db,
        store::matches::NewJobMatch {
            resume_id: resume.id,
            job_description: &job_description,
            job_role: job_role.as_deref(),
            job_location: job_location.as_deref(),
            alignment_score: report.alignment_score,
            alignment_rationale: &report.alignment_rationale,
            gaps: &gaps,
            strengths: &strengths,
            recommendations: &recommendations,
        },
    )
    .await?;

    Ok(Json(row))
}

/// GET /api/v1/matches/:id
pub async fn handle_get_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<JobMatchResponse>, AppError> {
    let row = store::matches::get_job_match(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job match {id} not found")))?;
    resume_owned_by(&state.db, row.resume_id, params.user_id).await?;
    Ok(Json(JobMatchResponse::from(row)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitGapResponsesRequest {
    pub user_id: Uuid,
    pub gap_responses: Vec<GapResponse>,
}

/// POST /api/v1/matches/:id/gap-responses
///
/// Resubmission is allowed: it overwrites the previous verdict and clears
/// any tailored resume derived from the superseded answers.
pub async fn handle_submit_gap_responses(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitGapResponsesRequest>,
) -> Result<Json<VerdictOutcome>, AppError> {
    let row = store::matches::get_job_match(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job match {id} not found")))?;
    let resume = resume_owned_by(&state.db, row.resume_id, req.user_id).await?;

    let gaps: Vec<Gap> =
        serde_json::from_value(row.gaps.clone()).map_err(|e| AppError::Internal(e.into()))?;
    validate_gap_responses(gaps.len(), &req.gap_responses)?;

    if MatchStage::of(&row) != MatchStage::AwaitingGapResponses {
        info!("Resubmitted gap responses for match {id}, overwriting the previous verdict");
    }

    let outcome = run_final_verdict(
        state.llm.as_ref(),
        &resume.extracted_text,
        &row.job_description,
        row.alignment_score,
        &gaps,
        &req.gap_responses,
    )
    .await?;

    let gap_responses =
        serde_json::to_value(&req.gap_responses).map_err(|e| AppError::Internal(e.into()))?;
    store::matches::set_gap_outcome(
        &state.db,
        id,
        &gap_responses,
        &outcome.final_verdict,
        outcome.should_apply,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job match {id} not found")))?;

    Ok(Json(outcome))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/matches/:id/tailored-resume
///
/// Requires gap responses: the rewrite folds in the user's confirmed
/// proficiencies. Regeneration overwrites the previous result.
pub async fn handle_generate_tailored_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<TailoredResumeResponse>, AppError> {
    let row = store::matches::get_job_match(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job match {id} not found")))?;
    let resume = resume_owned_by(&state.db, row.resume_id, req.user_id).await?;

    ensure_tailoring_allowed(&row)?;

    let gaps: Vec<Gap> =
        serde_json::from_value(row.gaps.clone()).map_err(|e| AppError::Internal(e.into()))?;
    let strengths: Vec<String> =
        serde_json::from_value(row.strengths.clone()).map_err(|e| AppError::Internal(e.into()))?;
    let responses: Vec<GapResponse> = match &row.gap_responses {
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|e| AppError::Internal(e.into()))?
        }
        None => Vec::new(),
    };

    info!("Generating tailored resume for match {id}");
    let tailored = run_tailoring(
        state.llm.as_ref(),
        &resume.extracted_text,
        &row.job_description,
        &strengths,
        &gaps,
        &responses,
    )
    .await?;

    store::matches::set_tailored_resume(
        &state.db,
        id,
        &tailored.changes_summary,
        &tailored.resume_markdown,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job match {id} not found")))?;

    Ok(Json(TailoredResumeResponse {
        changes_summary: tailored.changes_summary,
        resume_content: tailored.resume_markdown,
    }))
}
