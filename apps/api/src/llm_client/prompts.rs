// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to every task prompt so replies parse as a single JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Return ONLY a valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Maps a request language code to the language name used in prompts.
pub fn language_name(code: &str) -> &'static str {
    if is_vietnamese(code) {
        "Vietnamese"
    } else {
        "English"
    }
}

pub fn is_vietnamese(code: &str) -> bool {
    matches!(code.trim().to_lowercase().as_str(), "vi" | "vietnamese")
}
