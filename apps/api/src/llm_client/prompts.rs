// Shared prompt constants and prompt-building utilities.
// Each pipeline stage defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt for every schema-constrained task. Free-text tasks define
/// their own system prompts next to their templates.
pub const JSON_ONLY_SYSTEM: &str = "You are an expert career advisor and resume analyst. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Truncates `text` to at most `max_chars` characters without splitting a
/// character. Keeps prompt size bounded when whole resumes or job
/// descriptions are interpolated into a template.
pub fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_returns_short_input_unchanged() {
        assert_eq!(clip("short", 2000), "short");
    }

    #[test]
    fn clip_returns_exact_length_input_unchanged() {
        assert_eq!(clip("abc", 3), "abc");
    }

    #[test]
    fn clip_cuts_long_input_at_a_char_boundary() {
        assert_eq!(clip("héllo wörld", 4), "héll");
    }
}
