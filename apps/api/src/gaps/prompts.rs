// Prompt text for skill-gap analysis.

use crate::gaps::{sfia_level_name, GapContext, GapSubject};
use crate::llm_client::prompts::{language_name, JSON_ONLY_INSTRUCTION};

pub const GAP_ANALYSIS_SYSTEM: &str = "You are an expert HR consultant specializing in \
    skill development. Provide practical, actionable insights. Always return valid JSON.";

pub fn build_gap_analysis_prompt(context: &GapContext, subject: &GapSubject, language: &str) -> String {
    let lang = language_name(language);
    let gap_size = subject.gap_size();

    let mut optional = String::new();
    for (label, value) in [
        ("SKILL DESCRIPTION", &subject.skill_description),
        ("CURRENT LEVEL DESCRIPTION", &subject.current_level_description),
        ("REQUIRED LEVEL DESCRIPTION", &subject.required_level_description),
    ] {
        if let Some(text) = value.as_deref().filter(|t| !t.trim().is_empty()) {
            optional.push_str(&format!("{label}: {text}\n"));
        }
    }

    format!(
        "You are an expert HR consultant specializing in skill development and competency \
         frameworks (SFIA).\n\n\
         CONTEXT:\n\
         - Employee: {employee}\n\
         - Current Role: {role}\n\
         - Skill: {skill} ({code})\n\
         - Current Level: {current} ({current_name})\n\
         - Required Level: {required} ({required_name})\n\
         - Gap Size: {gap_size} levels\n\n\
         {optional}\n\
         TASK:\n\
         Analyze this skill gap. Consider why it matters for the role, the business impact \
         of not closing it, realistic strategies to close it, and its priority.\n\n\
         Return JSON matching this exact schema:\n\
         {{\n\
           \"ai_analysis\": \"why this gap matters and its impact (2-4 sentences in {lang})\",\n\
           \"ai_recommendation\": \"specific, actionable recommendation (2-4 sentences in {lang})\",\n\
           \"priority_rationale\": \"brief explanation of priority in {lang}\",\n\
           \"estimated_effort\": \"e.g. '3-6 months with focused training'\",\n\
           \"key_actions\": [\"Action 1\", \"Action 2\", \"Action 3\"],\n\
           \"potential_blockers\": [\"Blocker 1\", \"Blocker 2\"]\n\
         }}\n\n\
         Write all text fields in {lang}. Scale the approach to the gap size.\n\
         {JSON_ONLY_INSTRUCTION}",
        employee = context.employee_name,
        role = context.job_role,
        skill = subject.skill_name,
        code = subject.skill_code,
        current = subject.current_level,
        current_name = sfia_level_name(subject.current_level),
        required = subject.required_level,
        required_name = sfia_level_name(subject.required_level),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_context_and_level_names() {
        let context = GapContext {
            employee_name: "Linh Tran".to_string(),
            job_role: "Backend Engineer".to_string(),
        };
        let subject = GapSubject {
            skill_name: "Programming/software development".to_string(),
            skill_code: "PROG".to_string(),
            current_level: 2,
            required_level: 4,
            skill_description: Some("Designing and writing software".to_string()),
            current_level_description: None,
            required_level_description: Some("  ".to_string()),
        };

        let prompt = build_gap_analysis_prompt(&context, &subject, "en");
        assert!(prompt.contains("- Current Level: 2 (Assist)"));
        assert!(prompt.contains("- Required Level: 4 (Enable)"));
        assert!(prompt.contains("- Gap Size: 2 levels"));
        assert!(prompt.contains("SKILL DESCRIPTION: Designing and writing software"));
        assert!(!prompt.contains("REQUIRED LEVEL DESCRIPTION"));
        assert!(prompt.contains("in English"));
    }
}
