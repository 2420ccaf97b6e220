// Job matching flow: alignment scoring, gap assessment, final verdict,
// tailored resume. Stage progress is derived from row columns, never stored.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod assessment;
pub mod handlers;
pub mod matcher;
pub mod prompts;
pub mod tailoring;
