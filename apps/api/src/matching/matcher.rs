//! Job match scoring pipeline.
//!
//! 1. Interpolate the resume text and job description into the match prompt.
//! 2. Call the gateway with the job-match response schema.
//! 3. Normalize the payload: clamp the alignment score, default the
//!    rationale, coerce gap severities and truncate the advice lists.
//!
//! Also hosts curated job description synthesis, the free-text task that
//! feeds the match pipeline when the caller names a role and location
//! instead of pasting a posting.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{clamp_score, truncate_list, LlmGateway};

use super::prompts::{
    job_match_response_schema, JD_GENERATION_PROMPT_TEMPLATE, JD_GENERATION_SYSTEM,
    JOB_MATCH_PROMPT_TEMPLATE,
};

const MAX_GAPS: usize = 8;
const MAX_STRENGTHS: usize = 6;
const MAX_RECOMMENDATIONS: usize = 8;

/// Gap severity. Values outside the schema enum are coerced to `Medium`
/// rather than failing the whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn coerce(raw: &str) -> Severity {
        match raw.trim().to_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            other => {
                warn!("LLM returned unknown gap severity '{other}', coercing to medium");
                Severity::Medium
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// One gap between the resume and the job requirements. Index within the
/// stored `gaps` array is the identifier gap responses refer back to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub category: String,
    pub description: String,
    pub severity: Severity,
}

/// Normalized job match result, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchReport {
    pub alignment_score: i32,
    pub alignment_rationale: String,
    pub gaps: Vec<Gap>,
    pub strengths: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Job match payload as the model returns it, before normalization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJobMatch {
    #[serde(default)]
    alignment_score: i64,
    #[serde(default)]
    alignment_rationale: Option<String>,
    #[serde(default)]
    gaps: Vec<RawGap>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawGap {
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    severity: String,
}

impl Gap {
    fn from_raw(raw: RawGap) -> Gap {
        Gap {
            category: raw.category,
            description: raw.description,
            severity: Severity::coerce(&raw.severity),
        }
    }
}

impl JobMatchReport {
    fn from_raw(mut raw: RawJobMatch) -> JobMatchReport {
        truncate_list("gaps", &mut raw.gaps, MAX_GAPS);
        truncate_list("strengths", &mut raw.strengths, MAX_STRENGTHS);
        truncate_list("recommendations", &mut raw.recommendations, MAX_RECOMMENDATIONS);
        JobMatchReport {
            alignment_score: clamp_score("alignmentScore", raw.alignment_score, 100),
            alignment_rationale: raw
                .alignment_rationale
                .unwrap_or_else(|| "No rationale provided".to_string()),
            gaps: raw.gaps.into_iter().map(Gap::from_raw).collect(),
            strengths: raw.strengths,
            recommendations: raw.recommendations,
        }
    }
}

/// Score one resume against one job description.
pub async fn run_job_match(
    llm: &dyn LlmGateway,
    resume_text: &str,
    job_description: &str,
) -> Result<JobMatchReport, AppError> {
    let prompt = build_match_prompt(resume_text, job_description);
    let payload = llm
        .generate_structured(&prompt, JSON_ONLY_SYSTEM, job_match_response_schema())
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    let raw: RawJobMatch = serde_json::from_value(payload)
        .map_err(|e| AppError::Llm(format!("job match payload did not match schema: {e}")))?;
    Ok(JobMatchReport::from_raw(raw))
}

fn build_match_prompt(resume_text: &str, job_description: &str) -> String {
    JOB_MATCH_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{job_description}", job_description)
}

/// Synthesize a representative job description for a curated role and
/// location. The returned text is fed to the match pipeline unmodified.
pub async fn synthesize_job_description(
    llm: &dyn LlmGateway,
    role: &str,
    location: &str,
) -> Result<String, AppError> {
    let prompt = JD_GENERATION_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{location}", location);
    llm.generate_text(&prompt, JD_GENERATION_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    use crate::llm_client::testing::{FailingGateway, StubGateway};

    fn raw(payload: Value) -> RawJobMatch {
        serde_json::from_value(payload).unwrap()
    }

    #[test]
    fn severity_coercion_accepts_schema_values_in_any_case() {
        assert_eq!(Severity::coerce("high"), Severity::High);
        assert_eq!(Severity::coerce("HIGH"), Severity::High);
        assert_eq!(Severity::coerce(" medium "), Severity::Medium);
        assert_eq!(Severity::coerce("Low"), Severity::Low);
    }

    #[test]
    fn unknown_severity_becomes_medium() {
        assert_eq!(Severity::coerce("urgent"), Severity::Medium);
        assert_eq!(Severity::coerce(""), Severity::Medium);
        assert_eq!(Severity::coerce("critical!!"), Severity::Medium);
    }

    #[test]
    fn alignment_score_is_clamped_to_percentage_range() {
        let report = JobMatchReport::from_raw(raw(json!({"alignmentScore": 130})));
        assert_eq!(report.alignment_score, 100);

        let report = JobMatchReport::from_raw(raw(json!({"alignmentScore": -10})));
        assert_eq!(report.alignment_score, 0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let report = JobMatchReport::from_raw(raw(json!({})));
        assert_eq!(report.alignment_score, 0);
        assert_eq!(report.alignment_rationale, "No rationale provided");
        assert!(report.gaps.is_empty());
        assert!(report.strengths.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn oversized_lists_keep_the_first_items_in_order() {
        let gaps: Vec<Value> = (1..=9)
            .map(|i| json!({"category": format!("cat {i}"), "description": "d", "severity": "low"}))
            .collect();
        let strengths: Vec<String> = (1..=7).map(|i| format!("strength {i}")).collect();
        let recommendations: Vec<String> = (1..=10).map(|i| format!("rec {i}")).collect();

        let report = JobMatchReport::from_raw(raw(json!({
            "gaps": gaps,
            "strengths": strengths,
            "recommendations": recommendations,
        })));

        assert_eq!(report.gaps.len(), 8);
        assert_eq!(report.gaps[0].category, "cat 1");
        assert_eq!(report.gaps[7].category, "cat 8");
        assert_eq!(report.strengths.len(), 6);
        assert_eq!(report.strengths[5], "strength 6");
        assert_eq!(report.recommendations.len(), 8);
        assert_eq!(report.recommendations[7], "rec 8");
    }

    #[tokio::test]
    async fn run_job_match_interpolates_and_normalizes() {
        let gateway = StubGateway::returning(json!({
            "alignmentScore": 72,
            "alignmentRationale": "Strong backend overlap",
            "gaps": [
                {"category": "Technical Skills", "description": "No Kubernetes", "severity": "urgent"}
            ],
            "strengths": ["Rust services"],
            "recommendations": ["Take a Kubernetes course"]
        }));

        let report = run_job_match(&gateway, "Jane Doe, Platform Engineer", "Senior SRE role")
            .await
            .unwrap();

        assert_eq!(report.alignment_score, 72);
        assert_eq!(report.gaps[0].severity, Severity::Medium);
        assert_eq!(report.strengths, vec!["Rust services".to_string()]);

        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Jane Doe, Platform Engineer"));
        assert!(prompt.contains("Senior SRE role"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[tokio::test]
    async fn run_job_match_maps_gateway_failures_to_llm_errors() {
        let result = run_job_match(&FailingGateway, "resume", "jd").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[test]
    fn job_match_schema_pins_the_contract() {
        let schema = job_match_response_schema();
        assert_eq!(
            schema["required"],
            json!(["alignmentScore", "alignmentRationale", "gaps", "strengths", "recommendations"])
        );
        assert_eq!(
            schema["properties"]["gaps"]["items"]["properties"]["severity"]["enum"],
            json!(["high", "medium", "low"])
        );
    }

    #[tokio::test]
    async fn synthesize_job_description_returns_free_text() {
        let gateway = StubGateway::saying("Acme Corp is hiring a Staff Engineer in Berlin.");

        let jd = synthesize_job_description(&gateway, "Staff Engineer", "Berlin")
            .await
            .unwrap();

        assert_eq!(jd, "Acme Corp is hiring a Staff Engineer in Berlin.");
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Staff Engineer position in Berlin"));
        assert!(prompt.contains("the Berlin market"));
    }
}
