//! Career roadmap generation: one schema-constrained call that turns a
//! resume and a dream role into a phased action plan.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmGateway;

use super::prompts::{roadmap_response_schema, ROADMAP_PROMPT_TEMPLATE};

/// Planning horizon. The wire strings are fixed; anything else is
/// rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "6 months")]
    SixMonths,
    #[serde(rename = "1 year")]
    OneYear,
    #[serde(rename = "2 years")]
    TwoYears,
    #[serde(rename = "5 years")]
    FiveYears,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::SixMonths => "6 months",
            Timeframe::OneYear => "1 year",
            Timeframe::TwoYears => "2 years",
            Timeframe::FiveYears => "5 years",
        }
    }
}

/// One phase of the action plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Roadmap payload. Lists pass through at whatever length the model
/// returns: the counts are steered by the prompt, not clipped after
/// the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPlan {
    #[serde(default)]
    pub current_gaps: Vec<String>,
    #[serde(default)]
    pub skills_to_acquire: Vec<String>,
    #[serde(default)]
    pub action_plan: Vec<RoadmapPhase>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<String>,
}

/// Generate a career roadmap from the resume toward the dream role.
pub async fn run_roadmap(
    llm: &dyn LlmGateway,
    resume_text: &str,
    dream_role: &str,
    dream_location: &str,
    timeframe: Timeframe,
) -> Result<RoadmapPlan, AppError> {
    let prompt = ROADMAP_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{dream_role}", dream_role)
        .replace("{dream_location}", dream_location)
        .replace("{timeframe}", timeframe.as_str());
    let payload = llm
        .generate_structured(&prompt, JSON_ONLY_SYSTEM, roadmap_response_schema())
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    serde_json::from_value(payload)
        .map_err(|e| AppError::Llm(format!("roadmap payload did not match schema: {e}")))
}
