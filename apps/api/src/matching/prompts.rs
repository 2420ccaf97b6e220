// All LLM prompt constants for the Matching module: job-match scoring,
// curated job description synthesis, the final verdict, and the tailored
// resume. The two schema-constrained tasks also request their schema as
// constrained output through the gateway.

use serde_json::{json, Value};

/// Literal marker separating the two halves of the tailored-resume
/// response. Downstream parsing splits on this exact string.
pub const SECTION_SEPARATOR: &str = "===SEPARATOR===";

/// Character cap for resume and job description text embedded in the
/// verdict and tailoring prompts, which already carry the match context.
pub const CONTEXT_CLIP_CHARS: usize = 2_000;

/// Job match prompt template. Replace `{resume_text}` and
/// `{job_description}` before sending.
pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"You are an expert career coach and recruiter. Analyze how well this resume aligns with the job description.

RESUME TEXT:
{resume_text}

JOB DESCRIPTION:
{job_description}

Provide a comprehensive match analysis:

1. ALIGNMENT SCORE (0-100):
   - Overall percentage match between resume and job requirements
   - Consider: required skills, experience level, education, key responsibilities
   - A score of 80-100 means excellent fit, 60-79 good fit, 40-59 moderate fit, 0-39 poor fit

2. GAPS (identify 3-8 specific gaps):
   - Category: The area of the gap (e.g., "Technical Skills", "Experience", "Education", "Certifications")
   - Description: Specific gap description
   - Severity: "high" (critical missing requirement), "medium" (important but not critical), or "low" (nice to have)

3. STRENGTHS (identify 3-6 strong matches):
   - List specific areas where the resume strongly aligns with job requirements
   - Focus on relevant skills, experiences, and qualifications that match well

4. RECOMMENDATIONS (provide 5-8 specific actions):
   - Actionable suggestions to improve alignment
   - How to address the gaps
   - What to emphasize in application/interview

Respond with structured JSON only, no other text."#;

/// Structured-output schema for the job match task.
pub fn job_match_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "alignmentScore": {
                "type": "integer",
                "description": "Percentage match score from 0 to 100"
            },
            "alignmentRationale": {
                "type": "string",
                "description": "Brief explanation of the alignment score"
            },
            "gaps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "category": {"type": "string"},
                        "description": {"type": "string"},
                        "severity": {
                            "type": "string",
                            "enum": ["high", "medium", "low"]
                        }
                    },
                    "required": ["category", "description", "severity"]
                },
                "description": "3-8 specific gaps between resume and job requirements"
            },
            "strengths": {
                "type": "array",
                "items": {"type": "string"},
                "description": "3-6 strong alignment points"
            },
            "recommendations": {
                "type": "array",
                "items": {"type": "string"},
                "description": "5-8 specific actionable recommendations"
            }
        },
        "required": ["alignmentScore", "alignmentRationale", "gaps", "strengths", "recommendations"]
    })
}

/// System prompt for curated job description synthesis — a free-text task.
pub const JD_GENERATION_SYSTEM: &str = "You are an expert technical recruiter \
    who writes realistic job postings. \
    Respond with plain text only. \
    Do NOT wrap the posting in JSON or markdown code fences.";

/// Job description synthesis template. Replace `{role}` and `{location}`
/// before sending.
pub const JD_GENERATION_PROMPT_TEMPLATE: &str = r#"Generate a realistic, representative job description for a {role} position in {location}.

Include:
- Company overview (generic tech company)
- Role responsibilities (5-7 key responsibilities)
- Required qualifications (education, years of experience, must-have skills)
- Preferred qualifications (nice-to-have skills, bonus experiences)
- Benefits overview

Make it professional and typical of real job postings in the {location} market for this role.

Respond with just the job description text, no JSON or extra formatting."#;

/// Final verdict template. Replace `{alignment_score}`, `{gap_details}`,
/// `{resume_text}` and `{job_description}` before sending; the two text
/// blocks are clipped to 2,000 characters by the builder.
pub const VERDICT_PROMPT_TEMPLATE: &str = r#"You are an expert career coach. Based on the resume analysis and user's proficiency responses, provide a final recommendation.

RESUME ALIGNMENT SCORE: {alignment_score}%

GAPS AND USER'S PROFICIENCY:
{gap_details}

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

Based on:
1. The alignment score ({alignment_score}%)
2. The identified gaps and the user's actual proficiency levels
3. Overall fit between resume and job requirements

Provide:
1. A comprehensive final verdict (2-3 paragraphs) that:
   - Acknowledges the user's strengths
   - Discusses how their proficiency in gap areas affects their candidacy
   - Provides an honest but encouraging assessment
   - Remember: we believe in positivity and taking chances!

2. A boolean recommendation on whether they should apply:
   - true if alignment score >= 50% OR if user has at least basic proficiency in critical gaps
   - false only if alignment is very low (<30%) AND user lacks proficiency in most critical gaps
   - When in doubt, recommend true (we believe in taking chances!)

Respond with structured JSON only."#;

/// Structured-output schema for the final verdict task.
pub fn verdict_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "verdict": {
                "type": "string",
                "description": "2-3 paragraph final verdict and recommendation"
            },
            "shouldApply": {
                "type": "boolean",
                "description": "Whether the user should apply for this position"
            }
        },
        "required": ["verdict", "shouldApply"]
    })
}

/// System prompt for tailored resume generation — a free-text task parsed
/// by splitting on [`SECTION_SEPARATOR`].
pub const TAILORED_RESUME_SYSTEM: &str = "You are an expert resume writer \
    specializing in ATS-friendly, results-driven resumes. \
    Respond with plain text in the exact two-section format the prompt \
    describes. Do NOT wrap the response in JSON or markdown code fences.";

/// Tailored resume template. Replace `{original_resume}`,
/// `{job_description}` (clipped to 2,000 characters by the builder),
/// `{strengths}` and `{confirmed_skills}` before sending.
pub const TAILORED_RESUME_PROMPT_TEMPLATE: &str = r#"Create a tailored resume optimized for the target job using quantifiable, impact-oriented language.

ORIGINAL RESUME:
{original_resume}

TARGET JOB DESCRIPTION:
{job_description}

IDENTIFIED STRENGTHS TO HIGHLIGHT:
{strengths}

SKILLS USER CONFIRMED THEY HAVE (MUST ADD TO RESUME):
{confirmed_skills}

CRITICAL RULES FOR RESULTS-DRIVEN LANGUAGE:

**QUANTIFIABLE IMPACT (NO HALLUCINATION)**:
- Use existing metrics from the original resume - never invent new numbers
- If original says "improved performance", keep it as-is or enhance language without adding fake metrics
- Transform weak verbs into strong action verbs: "responsible for" → "led", "worked on" → "architected", "helped with" → "drove"
- Emphasize scale and impact using language, not invented numbers
- Examples of acceptable enhancements:
  ✓ "Managed team" → "Led cross-functional team in delivering critical infrastructure"
  ✓ "Worked on API" → "Architected and deployed REST API serving production traffic"
  ✓ "Improved performance" → "Optimized system performance through caching and query refinement"
  ✗ "Improved performance" → "Improved performance by 60%" (NEVER add fake metrics)
  ✗ "Led team" → "Led team of 5 engineers" (NEVER invent team sizes)

**ACTION VERB EXCELLENCE**:
- Replace passive language with strong action verbs
- Use: architected, engineered, led, drove, launched, scaled, optimized, reduced, increased, transformed, established, spearheaded
- Avoid: responsible for, worked on, helped with, participated in, involved in

MANDATORY PRESERVATION RULES:

1. **PRESERVE ALL SECTIONS**: Keep ALL original sections
   - Keep Volunteering, Awards, Certifications, Publications, Projects, Languages - EVERYTHING
   - If a section exists in the original, it MUST exist in the tailored version

2. **PRESERVE ALL CONTACT LINKS**:
   - Keep ALL contact information exactly as-is: email, phone, LinkedIn, GitHub, Google Scholar, portfolio, website, etc.
   - Make ALL links clickable using markdown format: [LinkedIn](URL) or [Google Scholar](URL)
   - Do NOT drop any links from the header

3. **ADD USER-CONFIRMED SKILLS**:
   - User rated themselves on missing skills - if they have basic/moderate/advanced proficiency, ADD those skills to the Skills section
   - This is NOT hallucination - the user CONFIRMED they have these skills
   - Example: If user said "Docker: moderate proficiency", add Docker to Skills section

4. **SECTION ORDER** (mandatory):
   - Header: Full Name + ALL Contact Links (email, phone, LinkedIn, GitHub, Google Scholar, portfolio, etc.)
   - Professional Summary (2-3 sentences optimized for target role)
   - **Skills** (RIGHT AFTER SUMMARY - organize by category, include user-confirmed skills)
   - Professional Experience (reorder bullets to emphasize relevant work)
   - Education
   - Certifications (if in original)
   - Volunteering (if in original)
   - Awards (if in original)
   - Any other sections from original

5. **OUTPUT FORMAT** - Return TWO sections separated by "===SEPARATOR===":

SECTION 1 - CHANGES SUMMARY (for UI display only):
# Changes Made

## Language Enhancements:
- [List 4-6 specific language improvements, e.g., "Transformed 'worked on microservices' to 'architected and deployed microservices'", "Enhanced 'managed team' to 'led cross-functional engineering team'"]

## Skills Added:
- [List skills you added based on user's gap proficiency responses]

## Strengths Emphasized:
- [List skills/experiences from original that match job requirements]

## Structure Preserved:
- All sections maintained including Volunteering, Awards, Certifications
- All contact links preserved (LinkedIn, GitHub, Google Scholar, email, phone)
- All existing metrics preserved without hallucination

===SEPARATOR===

SECTION 2 - ACTUAL RESUME (for DOCX download):
# [FULL NAME]
[Email](mailto:email) | [Phone] | [LinkedIn](URL) | [GitHub](URL) | [Google Scholar](URL) | [Portfolio](URL)

## Professional Summary
[2-3 sentences optimized for job]

## Skills
**Technical Skills:** [Include user-confirmed skills like Docker, REST API, etc.]
**Programming:** [Languages]
**Tools & Platforms:** [Tools]

## Professional Experience
**[Job Title]** | **[Company]** | [Dates]
- [Bullet with relevant keywords]

## Education
**[Degree]** | [Institution] | [Year]

## Certifications
[If in original]

## Volunteering
[If in original]

## Awards
[If in original]

FORMATTING RULES:
- Use markdown: # for name, ## for sections, - for bullets, **bold** for emphasis
- Make ALL URLs clickable: [Text](URL)
- No tables or special formatting
- Clean, ATS-friendly structure

Respond with BOTH sections separated by ===SEPARATOR==="#;
