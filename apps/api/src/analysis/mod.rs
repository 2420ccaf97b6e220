// Resume analysis: schema-constrained LLM review of one resume.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
