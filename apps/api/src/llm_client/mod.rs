/// LLM Client — the single point of entry for all Gemini API calls in ResuMatch.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All LLM interactions MUST go through this module, behind [`LlmGateway`].
///
/// Model: gemini-2.0-flash-exp (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all LLM calls in ResuMatch.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.0-flash-exp";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Seam between the pipeline stages and the model provider.
///
/// Production wires in [`GeminiClient`]; tests substitute a scripted stub so
/// every stage is exercisable without a network.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Free-text task. Returns the raw response text.
    async fn generate_text(&self, prompt: &str, system: &str) -> Result<String, LlmError>;

    /// Structured task. Requests JSON output constrained by `schema` and
    /// returns the parsed payload. Field-level validation and defaulting is
    /// the caller's concern; only JSON well-formedness is enforced here.
    async fn generate_structured(
        &self,
        prompt: &str,
        system: &str,
        schema: Value,
    ) -> Result<Value, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: SystemInstruction<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

impl GeminiResponse {
    /// Joins the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single LLM client used by all services in ResuMatch.
/// Wraps the Gemini generateContent API with retry logic and structured
/// output support.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw call to the Gemini API, returning the parsed response.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    async fn call(
        &self,
        prompt: &str,
        system: &str,
        schema: Option<&Value>,
    ) -> Result<GeminiResponse, LlmError> {
        let request_body = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![Part { text: system }],
            },
            generation_config: schema.map(|schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        };

        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse error message
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let gemini_response: GeminiResponse = response.json().await?;

            if let Some(usage) = &gemini_response.usage_metadata {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                    usage.prompt_token_count.unwrap_or(0),
                    usage.candidates_token_count.unwrap_or(0)
                );
            }

            return Ok(gemini_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl LlmGateway for GeminiClient {
    async fn generate_text(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system, None).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        system: &str,
        schema: Value,
    ) -> Result<Value, LlmError> {
        let response = self.call(prompt, system, Some(&schema)).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Clamps a model-returned score into `0..=max`, logging when the model
/// ignored its declared bounds. Scores are advisory, so out-of-range
/// values degrade instead of failing the stage.
pub fn clamp_score(field: &str, value: i64, max: i64) -> i32 {
    if value < 0 || value > max {
        warn!("LLM returned out-of-range {field}={value}, clamping to 0..={max}");
    }
    value.clamp(0, max) as i32
}

/// Truncates a model-returned list to its declared maximum cardinality,
/// keeping order.
pub fn truncate_list<T>(field: &str, values: &mut Vec<T>, max: usize) {
    if values.len() > max {
        warn!(
            "LLM returned {} {field}, keeping the first {max}",
            values.len()
        );
        values.truncate(max);
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Gateway doubles shared by the pipeline stage tests.
#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::{LlmError, LlmGateway};

    /// Records every prompt it sees and answers from a canned response.
    /// `returning` feeds structured tasks, `saying` free-text ones.
    pub struct StubGateway {
        payload: Option<Value>,
        text: Option<String>,
        pub seen_prompts: Mutex<Vec<String>>,
    }

    impl StubGateway {
        pub fn returning(payload: Value) -> Self {
            Self {
                payload: Some(payload),
                text: None,
                seen_prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn saying(text: &str) -> Self {
            Self {
                payload: None,
                text: Some(text.to_string()),
                seen_prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn last_prompt(&self) -> String {
            self.seen_prompts
                .lock()
                .unwrap()
                .last()
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmGateway for StubGateway {
        async fn generate_text(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.seen_prompts.lock().unwrap().push(prompt.to_string());
            self.text.clone().ok_or(LlmError::EmptyContent)
        }

        async fn generate_structured(
            &self,
            prompt: &str,
            _system: &str,
            _schema: Value,
        ) -> Result<Value, LlmError> {
            self.seen_prompts.lock().unwrap().push(prompt.to_string());
            self.payload.clone().ok_or(LlmError::EmptyContent)
        }
    }

    /// Fails every call, for exercising the error path.
    pub struct FailingGateway;

    #[async_trait]
    impl LlmGateway for FailingGateway {
        async fn generate_text(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }

        async fn generate_structured(
            &self,
            _prompt: &str,
            _system: &str,
            _schema: Value,
        ) -> Result<Value, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score("score", -5, 100), 0);
        assert_eq!(clamp_score("score", 140, 100), 100);
        assert_eq!(clamp_score("score", 72, 100), 72);
        assert_eq!(clamp_score("section", 9, 5), 5);
    }

    #[test]
    fn test_truncate_list_keeps_first_items() {
        let mut values: Vec<i32> = (1..=9).collect();
        truncate_list("items", &mut values, 8);
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7, 8]);

        let mut short = vec![1, 2];
        truncate_list("items", &mut short, 8);
        assert_eq!(short, vec![1, 2]);
    }

    #[test]
    fn test_response_text_joins_candidate_parts() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4}
        }"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }
}
