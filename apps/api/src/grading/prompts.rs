// Prompt text for free-text answer grading.

use crate::llm_client::prompts::{language_name, JSON_ONLY_INSTRUCTION};

pub const GRADING_SYSTEM: &str = "You are an expert educator and grader. \
    Always respond with valid JSON only, no markdown formatting.";

/// Everything the grading prompt is built from.
pub struct GradingPromptInput<'a> {
    pub question_content: &'a str,
    pub question_type: &'a str,
    pub expected_answer: Option<&'a str>,
    pub grading_rubric: Option<&'a str>,
    pub answer: &'a str,
    pub max_points: u32,
    pub language: &'a str,
}

pub fn build_grading_prompt(input: &GradingPromptInput<'_>) -> String {
    let lang = language_name(input.language);
    let max = input.max_points;
    let band = |fraction: f64| (max as f64 * fraction) as u32;

    let mut prompt = format!(
        "You are an expert educator grading a candidate's answer.\n\n\
         QUESTION:\n{}\n\n\
         QUESTION TYPE: {}\n\n\
         MAXIMUM POINTS: {max}\n\n",
        input.question_content, input.question_type
    );

    if let Some(expected) = input.expected_answer.filter(|s| !s.trim().is_empty()) {
        prompt.push_str(&format!("EXPECTED/MODEL ANSWER:\n{expected}\n\n"));
    }
    if let Some(rubric) = input.grading_rubric.filter(|s| !s.trim().is_empty()) {
        prompt.push_str(&format!("GRADING RUBRIC/CRITERIA:\n{rubric}\n\n"));
    }

    prompt.push_str(&format!(
        "CANDIDATE'S ANSWER:\n{answer}\n\n---\n\n\
         Grade this answer and provide detailed feedback in {lang}.\n\n\
         GRADING GUIDELINES:\n\
         1. Be fair and objective\n\
         2. Give partial credit for partially correct answers\n\
         3. For coding questions check logic, edge cases and return values\n\
         4. Be specific about what is right and what is wrong\n\n\
         SCORING BANDS:\n\
         - Completely correct: {max} points\n\
         - Mostly correct with minor issues: {mostly}-{almost} points\n\
         - Shows understanding but has significant errors: {partial_lo}-{partial_hi} points\n\
         - Some correct elements: {some_lo}-{some_hi} points\n\
         - Completely wrong or irrelevant: 0 points\n\n\
         Respond with a JSON object in this exact format:\n\
         {{\n\
           \"points_awarded\": <integer between 0 and {max}>,\n\
           \"percentage\": <number between 0 and 100>,\n\
           \"is_correct\": <true if points_awarded >= {pass_mark}, false otherwise>,\n\
           \"feedback\": \"<why this score>\",\n\
           \"strength_points\": [\"<specific strength>\"],\n\
           \"improvement_areas\": [\"<specific issue and how to fix it>\"],\n\
           \"detailed_analysis\": \"<what the question asks, what the answer does, why points were given or deducted>\"\n\
         }}\n\n\
         All text fields must be in {lang}. An empty or off-topic answer gets 0 points.\n\
         {JSON_ONLY_INSTRUCTION}",
        answer = input.answer,
        mostly = band(0.7),
        almost = max.saturating_sub(1),
        partial_lo = band(0.4),
        partial_hi = band(0.6),
        some_lo = band(0.2),
        some_hi = band(0.3),
        pass_mark = max as f64 * 0.7,
    ));

    prompt
}
