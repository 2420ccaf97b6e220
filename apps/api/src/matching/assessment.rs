//! Gap assessment: the user answers the identified gaps with their own
//! proficiency, and the final verdict task turns those answers into a
//! written recommendation plus a should-apply boolean.
//!
//! Stage progress is derived from the row's nullable columns on every
//! read. It is never stored, so the row cannot disagree with itself.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::{clip, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmGateway;
use crate::models::job_match::JobMatchRow;

use super::matcher::Gap;
use super::prompts::{verdict_response_schema, CONTEXT_CLIP_CHARS, VERDICT_PROMPT_TEMPLATE};

/// Self-assessed proficiency for one gap. Strictly typed: submissions
/// with values outside this enum are rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    None,
    Basic,
    Moderate,
    Advanced,
}

impl Proficiency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Proficiency::None => "none",
            Proficiency::Basic => "basic",
            Proficiency::Moderate => "moderate",
            Proficiency::Advanced => "advanced",
        }
    }
}

/// One answer in a gap response submission, tying a stored gap (by its
/// index in the match's gaps array) to the user's proficiency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapResponse {
    pub gap_index: usize,
    pub proficiency_level: Proficiency,
}

/// Progress of one job match through the assessment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStage {
    AwaitingGapResponses,
    VerdictReady,
    ResumeGenerated,
}

impl MatchStage {
    pub fn of(row: &JobMatchRow) -> MatchStage {
        if row.tailored_resume_content.is_some() {
            MatchStage::ResumeGenerated
        } else if row.final_verdict.is_some() {
            MatchStage::VerdictReady
        } else {
            MatchStage::AwaitingGapResponses
        }
    }
}

/// Tailoring precondition: the rewrite folds in the user's confirmed
/// proficiencies, so a match still awaiting gap responses cannot be
/// tailored yet.
pub fn ensure_tailoring_allowed(row: &JobMatchRow) -> Result<(), AppError> {
    if MatchStage::of(row) == MatchStage::AwaitingGapResponses {
        return Err(AppError::Validation(
            "Submit gap responses before generating a tailored resume".to_string(),
        ));
    }
    Ok(())
}

/// Checks a gap response submission against the match's stored gaps:
/// every index in range, no duplicates, every gap answered. A match
/// without gaps accepts only an empty submission.
pub fn validate_gap_responses(
    gap_count: usize,
    responses: &[GapResponse],
) -> Result<(), AppError> {
    if responses.is_empty() {
        if gap_count == 0 {
            return Ok(());
        }
        return Err(AppError::Validation(
            "At least one gap response is required".to_string(),
        ));
    }
    let mut answered = vec![false; gap_count];
    for response in responses {
        if response.gap_index >= gap_count {
            return Err(AppError::Validation(format!(
                "gapIndex {} is out of range for a match with {gap_count} gaps",
                response.gap_index
            )));
        }
        if answered[response.gap_index] {
            return Err(AppError::Validation(format!(
                "Duplicate response for gapIndex {}",
                response.gap_index
            )));
        }
        answered[response.gap_index] = true;
    }
    if let Some(missing) = answered.iter().position(|covered| !covered) {
        return Err(AppError::Validation(format!(
            "Missing response for gapIndex {missing}"
        )));
    }
    Ok(())
}

/// Result of the final verdict task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictOutcome {
    pub final_verdict: String,
    pub should_apply: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerdict {
    #[serde(default)]
    verdict: Option<String>,
    #[serde(default)]
    should_apply: Option<bool>,
}

/// Generate the final verdict for a match from the user's gap responses.
pub async fn run_final_verdict(
    llm: &dyn LlmGateway,
    resume_text: &str,
    job_description: &str,
    alignment_score: i32,
    gaps: &[Gap],
    responses: &[GapResponse],
) -> Result<VerdictOutcome, AppError> {
    let prompt = VERDICT_PROMPT_TEMPLATE
        .replace("{alignment_score}", &alignment_score.to_string())
        .replace("{gap_details}", &build_gap_details(gaps, responses))
        .replace("{resume_text}", clip(resume_text, CONTEXT_CLIP_CHARS))
        .replace("{job_description}", clip(job_description, CONTEXT_CLIP_CHARS));
    let payload = llm
        .generate_structured(&prompt, JSON_ONLY_SYSTEM, verdict_response_schema())
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    let raw: RawVerdict = serde_json::from_value(payload)
        .map_err(|e| AppError::Llm(format!("verdict payload did not match schema: {e}")))?;
    Ok(VerdictOutcome {
        final_verdict: raw
            .verdict
            .unwrap_or_else(|| "Unable to generate verdict at this time.".to_string()),
        should_apply: raw.should_apply.unwrap_or(true),
    })
}

/// One line per stored gap, in array order, with the user's proficiency
/// or "not provided".
fn build_gap_details(gaps: &[Gap], responses: &[GapResponse]) -> String {
    gaps.iter()
        .enumerate()
        .map(|(index, gap)| {
            let proficiency = responses
                .iter()
                .find(|response| response.gap_index == index)
                .map(|response| response.proficiency_level.as_str())
                .unwrap_or("not provided");
            format!(
                "{} - {} (Severity: {}, User's proficiency: {})",
                gap.category,
                gap.description,
                gap.severity.as_str(),
                proficiency
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use crate::llm_client::testing::{FailingGateway, StubGateway};
    use crate::matching::matcher::Severity;

    fn match_row() -> JobMatchRow {
        JobMatchRow {
            id: Uuid::new_v4(),
            resume_id: Uuid::new_v4(),
            job_description: "Senior Rust Engineer".to_string(),
            job_role: None,
            job_location: None,
            alignment_score: 70,
            alignment_rationale: "Solid overlap".to_string(),
            gaps: json!([]),
            strengths: json!([]),
            recommendations: json!([]),
            gap_responses: None,
            final_verdict: None,
            should_apply: None,
            changes_summary: None,
            tailored_resume_content: None,
            created_at: Utc::now(),
        }
    }

    fn response(gap_index: usize, proficiency_level: Proficiency) -> GapResponse {
        GapResponse {
            gap_index,
            proficiency_level,
        }
    }

    #[test]
    fn stage_is_derived_from_nullable_columns() {
        let mut row = match_row();
        assert_eq!(MatchStage::of(&row), MatchStage::AwaitingGapResponses);

        row.gap_responses = Some(json!([{"gapIndex": 0, "proficiencyLevel": "basic"}]));
        row.final_verdict = Some("Go for it.".to_string());
        row.should_apply = Some(true);
        assert_eq!(MatchStage::of(&row), MatchStage::VerdictReady);

        row.changes_summary = Some("# Changes Made".to_string());
        row.tailored_resume_content = Some("# Jane Doe".to_string());
        assert_eq!(MatchStage::of(&row), MatchStage::ResumeGenerated);
    }

    #[test]
    fn stage_serializes_to_camel_case_wire_strings() {
        assert_eq!(
            serde_json::to_value(MatchStage::AwaitingGapResponses).unwrap(),
            json!("awaitingGapResponses")
        );
        assert_eq!(
            serde_json::to_value(MatchStage::VerdictReady).unwrap(),
            json!("verdictReady")
        );
        assert_eq!(
            serde_json::to_value(MatchStage::ResumeGenerated).unwrap(),
            json!("resumeGenerated")
        );
    }

    #[test]
    fn tailoring_is_rejected_until_a_verdict_exists() {
        let mut row = match_row();
        assert!(matches!(
            ensure_tailoring_allowed(&row),
            Err(AppError::Validation(_))
        ));

        row.final_verdict = Some("Go for it.".to_string());
        assert!(ensure_tailoring_allowed(&row).is_ok());

        row.tailored_resume_content = Some("# Jane Doe".to_string());
        assert!(ensure_tailoring_allowed(&row).is_ok());
    }

    #[test]
    fn verdict_schema_requires_both_contract_fields() {
        let schema = verdict_response_schema();
        assert_eq!(schema["required"], json!(["verdict", "shouldApply"]));
        assert_eq!(schema["properties"]["shouldApply"]["type"], json!("boolean"));
    }

    #[test]
    fn valid_responses_cover_every_gap_in_any_order() {
        let responses = vec![
            response(2, Proficiency::Advanced),
            response(0, Proficiency::None),
            response(1, Proficiency::Basic),
        ];
        assert!(validate_gap_responses(3, &responses).is_ok());
    }

    #[test]
    fn empty_submission_is_rejected_when_gaps_exist() {
        let err = validate_gap_responses(3, &[]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn empty_submission_is_accepted_when_the_match_has_no_gaps() {
        assert!(validate_gap_responses(0, &[]).is_ok());
    }

    #[test]
    fn out_of_range_index_is_rejected_and_named() {
        let responses = vec![response(99, Proficiency::Basic)];
        match validate_gap_responses(3, &responses) {
            Err(AppError::Validation(message)) => {
                assert!(message.contains("99"));
                assert!(message.contains("3 gaps"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let responses = vec![
            response(0, Proficiency::Basic),
            response(0, Proficiency::Advanced),
        ];
        match validate_gap_responses(2, &responses) {
            Err(AppError::Validation(message)) => assert!(message.contains("Duplicate")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn unanswered_gap_is_rejected_and_named() {
        let responses = vec![response(0, Proficiency::Basic), response(2, Proficiency::None)];
        match validate_gap_responses(3, &responses) {
            Err(AppError::Validation(message)) => assert!(message.contains("gapIndex 1")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn proficiency_rejects_values_outside_the_enum() {
        assert!(serde_json::from_value::<Proficiency>(json!("advanced")).is_ok());
        assert!(serde_json::from_value::<Proficiency>(json!("expert")).is_err());
        assert!(serde_json::from_value::<Proficiency>(json!("Basic")).is_err());

        let parsed: GapResponse =
            serde_json::from_value(json!({"gapIndex": 1, "proficiencyLevel": "moderate"})).unwrap();
        assert_eq!(parsed, response(1, Proficiency::Moderate));
    }

    #[test]
    fn gap_details_lines_follow_the_prompt_format() {
        let gaps = vec![
            Gap {
                category: "Technical Skills".to_string(),
                description: "No Kubernetes experience".to_string(),
                severity: Severity::High,
            },
            Gap {
                category: "Certifications".to_string(),
                description: "Missing AWS certification".to_string(),
                severity: Severity::Low,
            },
        ];
        let responses = vec![response(0, Proficiency::Basic)];

        let details = build_gap_details(&gaps, &responses);

        assert_eq!(
            details,
            "Technical Skills - No Kubernetes experience (Severity: high, User's proficiency: basic)\n\
             Certifications - Missing AWS certification (Severity: low, User's proficiency: not provided)"
        );
    }

    #[tokio::test]
    async fn verdict_defaults_apply_when_the_payload_is_empty() {
        let gateway = StubGateway::returning(json!({}));

        let outcome = run_final_verdict(&gateway, "resume", "jd", 55, &[], &[])
            .await
            .unwrap();

        assert_eq!(outcome.final_verdict, "Unable to generate verdict at this time.");
        assert!(outcome.should_apply);
    }

    #[tokio::test]
    async fn verdict_passes_through_model_values() {
        let gateway = StubGateway::returning(json!({
            "verdict": "Strong candidate with minor gaps.",
            "shouldApply": false
        }));

        let outcome = run_final_verdict(&gateway, "resume", "jd", 25, &[], &[])
            .await
            .unwrap();

        assert_eq!(outcome.final_verdict, "Strong candidate with minor gaps.");
        assert!(!outcome.should_apply);
    }

    #[tokio::test]
    async fn verdict_prompt_clips_long_context_and_interpolates_the_score() {
        let gateway = StubGateway::returning(json!({"verdict": "ok", "shouldApply": true}));
        let long_resume = "r".repeat(2_500);

        run_final_verdict(&gateway, &long_resume, "jd", 61, &[], &[])
            .await
            .unwrap();

        let prompt = gateway.last_prompt();
        assert!(prompt.contains("RESUME ALIGNMENT SCORE: 61%"));
        assert!(prompt.contains(&"r".repeat(2_000)));
        assert!(!prompt.contains(&"r".repeat(2_001)));
    }

    #[tokio::test]
    async fn verdict_maps_gateway_failures_to_llm_errors() {
        let result = run_final_verdict(&FailingGateway, "resume", "jd", 70, &[], &[]).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
