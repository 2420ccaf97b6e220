// All LLM prompt constants for the Analysis module.
// The same schema the template promises is also requested as constrained
// output through the gateway.

use serde_json::{json, Value};

/// Analysis prompt template. Replace `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a brutally honest resume expert and career coach. Act as a recruiter reviewing this resume - be direct about weaknesses.

RESUME TEXT:
{resume_text}

Evaluate the resume across these dimensions:

1. COMPLETENESS SCORE (0-100):
   - Assess how complete and comprehensive the resume is
   - Consider: contact info, summary/objective, work experience, education, skills, achievements
   - Provide a numerical score and brutally honest rationale

2. SECTION QUALITY SCORES (0-5 each):
   - Summary: Quality and impact of professional summary/objective
   - Education: Completeness and presentation of educational background
   - Experience: Depth, relevance, and presentation of work history
   - Other: Projects, volunteering, awards, skills, certifications

   Scoring guide:
   0 = Missing or severely lacking
   1-2 = Weak, needs significant improvement
   3 = Fair, meets basic requirements
   4 = Strong, well-presented
   5 = Perfect, exceptional quality

3. IMPROVEMENT SUGGESTIONS (BE BRUTALLY HONEST):
   - Provide 5-8 specific, actionable suggestions to improve the resume
   - Call out overused buzzwords (e.g., "team player", "hard worker", "passionate")
   - Identify vague statements lacking metrics or outcomes
   - Flag weak action verbs (e.g., "responsible for", "helped with", "worked on")
   - Point out where quantifiable results are missing (percentages, dollar amounts, time saved, scale)
   - Suggest stronger action verbs (led, architected, scaled, reduced, increased, launched)
   - Be direct: if something is weak or generic, say so clearly
   - Focus on results-driven, impact-oriented language

CRITICAL: When suggesting improvements about metrics:
- DO say: "Add quantifiable metrics to demonstrate impact"
- DO say: "Replace 'managed projects' with specific outcomes and scale"
- DO NOT invent or suggest specific numbers that aren't in the resume
- DO NOT hallucinate metrics - only encourage the user to add their own real numbers

Respond with structured JSON only, no other text."#;

/// Structured-output schema for the analysis task.
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "completenessScore": {
                "type": "integer",
                "description": "Overall completeness score from 0 to 100"
            },
            "completenessRationale": {
                "type": "string",
                "description": "Brief explanation of the completeness score"
            },
            "sectionScores": {
                "type": "object",
                "properties": {
                    "summary": {"type": "integer"},
                    "education": {"type": "integer"},
                    "experience": {"type": "integer"},
                    "other": {"type": "integer"}
                },
                "required": ["summary", "education", "experience", "other"]
            },
            "suggestions": {
                "type": "array",
                "items": {"type": "string"},
                "description": "5-8 specific improvement suggestions"
            }
        },
        "required": ["completenessScore", "completenessRationale", "sectionScores", "suggestions"]
    })
}
