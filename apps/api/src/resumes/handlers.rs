use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::state::AppState;
use crate::store;

use super::ingest::{ingest_resume, Upload};

/// Owner scoping for GET endpoints, passed as `?user_id=`.
#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Fetches a resume and checks it belongs to the given user. The shared
/// ownership gate for every endpoint that hangs off a resume.
pub(crate) async fn resume_owned_by(
    pool: &PgPool,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<ResumeRow, AppError> {
    let resume = store::resumes::get_resume(pool, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
    if resume.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(resume)
}

/// POST /api/v1/resumes
///
/// Multipart form with a `user_id` text field and a `file` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeRow>, AppError> {
    let mut user_id: Option<Uuid> = None;
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {e}")))?
    {
        match field.name() {
            Some("user_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable user_id field: {e}")))?;
                user_id = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::Validation("user_id must be a UUID".to_string()))?,
                );
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable file field: {e}")))?;
                upload = Some(Upload {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let user_id = user_id.ok_or_else(|| AppError::Validation("Missing user_id field".to_string()))?;
    let upload = upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let row = ingest_resume(&state.db, user_id, upload).await?;
    Ok(Json(row))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let resumes = store::resumes::list_resumes_for_owner(&state.db, params.user_id).await?;
    Ok(Json(resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = resume_owned_by(&state.db, id, params.user_id).await?;
    Ok(Json(resume))
}
