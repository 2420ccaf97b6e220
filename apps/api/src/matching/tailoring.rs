//! Tailored resume generation, the last stage of the match flow.
//!
//! The model returns one free-text blob holding a changes summary and the
//! rewritten resume, separated by a literal marker. Parsing must survive
//! a missing marker without failing the request.

use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::prompts::clip;
use crate::llm_client::LlmGateway;

use super::assessment::{GapResponse, Proficiency};
use super::matcher::Gap;
use super::prompts::{
    CONTEXT_CLIP_CHARS, SECTION_SEPARATOR, TAILORED_RESUME_PROMPT_TEMPLATE, TAILORED_RESUME_SYSTEM,
};

/// The two halves of a tailored-resume response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoredResume {
    pub changes_summary: String,
    pub resume_markdown: String,
}

/// Rewrite the resume for the target job, folding in the match strengths
/// and the skills the user confirmed during gap assessment.
pub async fn run_tailoring(
    llm: &dyn LlmGateway,
    resume_text: &str,
    job_description: &str,
    strengths: &[String],
    gaps: &[Gap],
    responses: &[GapResponse],
) -> Result<TailoredResume, AppError> {
    let strengths_text = strengths
        .iter()
        .map(|strength| format!("- {strength}"))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = TAILORED_RESUME_PROMPT_TEMPLATE
        .replace("{original_resume}", resume_text)
        .replace("{job_description}", clip(job_description, CONTEXT_CLIP_CHARS))
        .replace("{strengths}", &strengths_text)
        .replace("{confirmed_skills}", &build_confirmed_skills(gaps, responses));
    let full = llm
        .generate_text(&prompt, TAILORED_RESUME_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    Ok(split_tailored_response(&full))
}

/// Bullet list of the skills the user confirmed, in submission order.
/// `none` answers are left out; an all-`none` submission yields a fixed
/// "nothing to add" line.
fn build_confirmed_skills(gaps: &[Gap], responses: &[GapResponse]) -> String {
    let confirmed: Vec<String> = responses
        .iter()
        .filter(|response| response.proficiency_level != Proficiency::None)
        .filter_map(|response| {
            gaps.get(response.gap_index).map(|gap| {
                format!(
                    "- {}: User confirmed {} proficiency - ADD this to Skills section",
                    gap.category,
                    response.proficiency_level.as_str()
                )
            })
        })
        .collect();
    if confirmed.is_empty() {
        "None - user did not confirm proficiency in gap areas".to_string()
    } else {
        confirmed.join("\n")
    }
}

/// Split the model response on the section marker. A response without
/// the marker keeps the full text as the resume body and gets a
/// placeholder changes summary.
fn split_tailored_response(full: &str) -> TailoredResume {
    match full.find(SECTION_SEPARATOR) {
        Some(index) => TailoredResume {
            changes_summary: full[..index].trim().to_string(),
            resume_markdown: full[index + SECTION_SEPARATOR.len()..].trim().to_string(),
        },
        None => {
            warn!("Tailored resume response has no section marker, keeping full text as the body");
            TailoredResume {
                changes_summary: "Unable to generate changes summary".to_string(),
                resume_markdown: full.to_string(),
            }
        }
    }
}
