//! Resume analysis pipeline.
//!
//! Pipeline:
//!   1. Build the analysis prompt from the resume text
//!   2. Request schema-constrained JSON through the gateway
//!   3. Normalize the payload: clamp scores, truncate lists, fill defaults
//!
//! The model is never trusted to respect bounds; every numeric field is
//! clamped and every list capped after parsing.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{clamp_score, truncate_list, LlmGateway};

use super::prompts::{analysis_response_schema, ANALYSIS_PROMPT_TEMPLATE};

pub const MAX_SUGGESTIONS: usize = 8;

/// Normalized analysis payload. Every field is in-domain once `from_raw`
/// has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub completeness_score: i32,
    pub completeness_rationale: String,
    pub section_scores: SectionScores,
    pub suggestions: Vec<String>,
}

/// Quality score (0-5) for each of the four reviewed resume sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScores {
    pub summary: i32,
    pub education: i32,
    pub experience: i32,
    pub other: i32,
}

/// Raw model payload. Every field defaults so a partially malformed
/// response still yields a usable result; only a wrong-typed field or a
/// non-object payload fails the stage.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    #[serde(default)]
    completeness_score: i64,
    #[serde(default)]
    completeness_rationale: Option<String>,
    #[serde(default)]
    section_scores: RawSectionScores,
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSectionScores {
    #[serde(default)]
    summary: i64,
    #[serde(default)]
    education: i64,
    #[serde(default)]
    experience: i64,
    #[serde(default)]
    other: i64,
}

impl ResumeAnalysis {
    fn from_raw(raw: RawAnalysis) -> Self {
        let mut suggestions = raw.suggestions;
        truncate_list("suggestions", &mut suggestions, MAX_SUGGESTIONS);

        ResumeAnalysis {
            completeness_score: clamp_score("completenessScore", raw.completeness_score, 100),
            completeness_rationale: raw
                .completeness_rationale
                .unwrap_or_else(|| "No rationale provided".to_string()),
            section_scores: SectionScores {
                summary: clamp_score("sectionScores.summary", raw.section_scores.summary, 5),
                education: clamp_score("sectionScores.education", raw.section_scores.education, 5),
                experience: clamp_score(
                    "sectionScores.experience",
                    raw.section_scores.experience,
                    5,
                ),
                other: clamp_score("sectionScores.other", raw.section_scores.other, 5),
            },
            suggestions,
        }
    }
}

/// Runs the analysis task against the gateway and returns the normalized
/// payload.
pub async fn run_analysis(
    llm: &dyn LlmGateway,
    resume_text: &str,
) -> Result<ResumeAnalysis, AppError> {
    let prompt = build_prompt(resume_text);
    let payload = llm
        .generate_structured(&prompt, JSON_ONLY_SYSTEM, analysis_response_schema())
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let raw: RawAnalysis = serde_json::from_value(payload)
        .map_err(|e| AppError::Llm(format!("analysis payload did not match schema: {e}")))?;

    Ok(ResumeAnalysis::from_raw(raw))
}

fn build_prompt(resume_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    use crate::llm_client::testing::{FailingGateway, StubGateway};

    fn raw(payload: Value) -> RawAnalysis {
        serde_json::from_value(payload).unwrap()
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let analysis = ResumeAnalysis::from_raw(raw(json!({
            "completenessScore": -5,
            "sectionScores": {"summary": 9, "education": -1, "experience": 3, "other": 5}
        })));
        assert_eq!(analysis.completeness_score, 0);
        assert_eq!(analysis.section_scores.summary, 5);
        assert_eq!(analysis.section_scores.education, 0);
        assert_eq!(analysis.section_scores.experience, 3);
        assert_eq!(analysis.section_scores.other, 5);

        let analysis = ResumeAnalysis::from_raw(raw(json!({"completenessScore": 140})));
        assert_eq!(analysis.completeness_score, 100);
    }

    #[test]
    fn excess_suggestions_keep_the_first_eight_in_order() {
        let suggestions: Vec<String> = (1..=9).map(|i| format!("suggestion {i}")).collect();
        let analysis = ResumeAnalysis::from_raw(raw(json!({"suggestions": suggestions})));
        assert_eq!(analysis.suggestions.len(), 8);
        assert_eq!(analysis.suggestions[0], "suggestion 1");
        assert_eq!(analysis.suggestions[7], "suggestion 8");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let analysis = ResumeAnalysis::from_raw(raw(json!({})));
        assert_eq!(analysis.completeness_score, 0);
        assert_eq!(analysis.completeness_rationale, "No rationale provided");
        assert_eq!(analysis.section_scores.summary, 0);
        assert!(analysis.suggestions.is_empty());
    }

    #[tokio::test]
    async fn run_analysis_interpolates_the_resume_and_normalizes() {
        let gateway = StubGateway::returning(json!({
            "completenessScore": 72,
            "completenessRationale": "Solid but thin on metrics.",
            "sectionScores": {"summary": 4, "education": 5, "experience": 3, "other": 2},
            "suggestions": ["Add metrics to the platform migration bullet."]
        }));

        let analysis = run_analysis(&gateway, "Jane Doe, Platform Engineer")
            .await
            .unwrap();

        assert_eq!(analysis.completeness_score, 72);
        assert_eq!(analysis.section_scores.education, 5);
        assert_eq!(analysis.suggestions.len(), 1);

        let prompts = gateway.seen_prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Jane Doe, Platform Engineer"));
        assert!(!prompts[0].contains("{resume_text}"));
    }

    #[tokio::test]
    async fn gateway_failure_surfaces_as_llm_error() {
        let result = run_analysis(&FailingGateway, "text").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn non_object_payload_fails_the_stage() {
        let gateway = StubGateway::returning(json!(["not", "an", "object"]));
        let result = run_analysis(&gateway, "text").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[test]
    fn analysis_schema_pins_the_contract() {
        let schema = analysis_response_schema();
        assert_eq!(
            schema["required"],
            json!(["completenessScore", "completenessRationale", "sectionScores", "suggestions"])
        );
        assert_eq!(
            schema["properties"]["sectionScores"]["required"],
            json!(["summary", "education", "experience", "other"])
        );
    }
}
