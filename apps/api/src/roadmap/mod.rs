// Career roadmap: one schema-constrained LLM call mapping the current
// resume to a phased plan toward a dream role.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod handlers;
pub mod planner;
pub mod prompts;
