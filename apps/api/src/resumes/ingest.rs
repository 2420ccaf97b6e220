//! Resume ingestion: resolve the file kind, extract text, apply the
//! quality gate, persist.

use bytes::Bytes;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{self, ExtractError, FileKind};
use crate::models::resume::ResumeRow;
use crate::store;

/// Minimum extracted characters for an upload to count as a resume.
const MIN_EXTRACTED_CHARS: usize = 50;

/// One uploaded file, as pulled out of the multipart request.
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Extract text from the upload and persist it as the user's new resume.
pub async fn ingest_resume(
    pool: &PgPool,
    user_id: Uuid,
    upload: Upload,
) -> Result<ResumeRow, AppError> {
    let (kind, mime_type) = resolve_kind(&upload)?;

    info!(
        "Extracting text from '{}' ({mime_type}, {} bytes) for user {user_id}",
        upload.filename,
        upload.bytes.len()
    );
    let filesize = upload.bytes.len() as i64;
    let extracted_text = extraction::extract(upload.bytes, kind).await?;
    ensure_sufficient_text(&extracted_text)?;

    let row = store::resumes::create_resume(
        pool,
        store::resumes::NewResume {
            user_id,
            filename: &upload.filename,
            filesize,
            mime_type: &mime_type,
            extracted_text: &extracted_text,
        },
    )
    .await?;
    info!(
        "Stored resume {} ({} chars) for user {user_id}",
        row.id,
        extracted_text.chars().count()
    );
    Ok(row)
}

/// The filename extension decides the file kind and the stored MIME type.
/// Extensionless uploads fall back to the declared content type.
fn resolve_kind(upload: &Upload) -> Result<(FileKind, String), AppError> {
    if let Some((kind, mime_type)) = FileKind::from_filename(&upload.filename) {
        return Ok((kind, mime_type.to_string()));
    }
    if let Some(content_type) = upload.content_type.as_deref() {
        if let Some(kind) = FileKind::from_mime(content_type) {
            return Ok((kind, content_type.to_string()));
        }
    }
    Err(AppError::Extraction(ExtractError::UnsupportedFormat(
        upload.filename.clone(),
    )))
}

/// The quality gate: anything under 50 characters is not a resume, even
/// when extraction technically succeeded.
fn ensure_sufficient_text(text: &str) -> Result<(), AppError> {
    if text.chars().count() < MIN_EXTRACTED_CHARS {
        return Err(AppError::UnprocessableEntity(
            "Could not extract sufficient text from the file.".to_string(),
        ));
    }
    Ok(())
}
