//! Answer Grader: AI grading of free-text answers (short answer, long answer, coding).
//!
//! The model proposes a score and feedback; this module clamps the score to the
//! question's range and recomputes the percentage so a misbehaving model cannot
//! report more points than the question is worth.

pub mod handlers;
pub mod prompts;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::assessment::aggregator::round_one_decimal;
use crate::assessment::classifier::LEVEL_PASS_THRESHOLD;
use crate::errors::AppError;
use crate::grading::prompts::{build_grading_prompt, GradingPromptInput, GRADING_SYSTEM};
use crate::llm_client::prompts::is_vietnamese;
use crate::llm_client::reply::lenient_number;
use crate::llm_client::{call_json, CompletionOptions, LlmBackend};

const GRADING_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.3,
    max_tokens: 1000,
};

#[derive(Debug, Clone, Deserialize)]
pub struct GradeAnswerRequest {
    #[serde(default)]
    pub question_id: Option<String>,
    pub question_content: String,
    /// Null, missing and blank answers are all treated as "no answer".
    #[serde(default)]
    pub submitted_answer: Option<Value>,
    pub max_points: u32,
    /// Either free text or a JSON object describing the criteria.
    #[serde(default)]
    pub grading_rubric: Option<Value>,
    #[serde(default)]
    pub expected_answer: Option<String>,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeAnswerResponse {
    pub success: bool,
    pub question_id: Option<String>,
    pub points_awarded: u32,
    pub max_points: u32,
    pub percentage: f64,
    pub is_correct: bool,
    pub feedback: String,
    pub strength_points: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub detailed_analysis: String,
    pub graded_at: DateTime<Utc>,
}

/// What the model is asked to return. Every field is optional; gaps are filled in.
#[derive(Debug, Default, Deserialize)]
struct GradingReply {
    #[serde(default, deserialize_with = "lenient_number")]
    points_awarded: Option<f64>,
    #[serde(default)]
    is_correct: Option<bool>,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    strength_points: Vec<String>,
    #[serde(default)]
    improvement_areas: Vec<String>,
    #[serde(default)]
    detailed_analysis: Option<String>,
}

fn answer_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn rubric_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn validate(request: &GradeAnswerRequest) -> Result<(), AppError> {
    if request.question_content.trim().is_empty() {
        return Err(AppError::Validation(
            "question_content cannot be empty".to_string(),
        ));
    }
    if request.max_points == 0 {
        return Err(AppError::Validation(
            "max_points must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub async fn grade_answer(
    request: &GradeAnswerRequest,
    llm: &dyn LlmBackend,
) -> Result<GradeAnswerResponse, AppError> {
    validate(request)?;

    let answer = answer_text(request.submitted_answer.as_ref());
    let language = request.language.as_deref().unwrap_or("en");
    let max_points = request.max_points;

    info!(
        "Grading answer for question (max_points={max_points}, answer_len={}, type={:?})",
        answer.len(),
        request.question_type
    );

    if answer.trim().is_empty() {
        warn!("Empty answer received for question {:?}", request.question_id);
        return Ok(no_answer(request.question_id.clone(), max_points, language));
    }

    let rubric = rubric_text(request.grading_rubric.as_ref());
    let prompt = build_grading_prompt(&GradingPromptInput {
        question_content: &request.question_content,
        question_type: request.question_type.as_deref().unwrap_or("ShortAnswer"),
        expected_answer: request.expected_answer.as_deref(),
        grading_rubric: rubric.as_deref(),
        answer: &answer,
        max_points,
        language,
    });

    let reply: GradingReply = call_json(llm, GRADING_SYSTEM, &prompt, GRADING_OPTIONS)
        .await
        .map_err(|e| AppError::Llm(format!("Grading failed: {e}")))?;

    let graded = normalize_reply(reply, request.question_id.clone(), max_points);
    info!(
        "Grading complete: {}/{} ({}%)",
        graded.points_awarded, graded.max_points, graded.percentage
    );
    Ok(graded)
}

fn normalize_reply(
    reply: GradingReply,
    question_id: Option<String>,
    max_points: u32,
) -> GradeAnswerResponse {
    let raw = reply.points_awarded.unwrap_or(0.0);
    let points_awarded = if raw.is_finite() {
        raw.trunc().clamp(0.0, max_points as f64) as u32
    } else {
        0
    };
    let percentage = round_one_decimal(points_awarded as f64 / max_points as f64 * 100.0);
    let is_correct = reply
        .is_correct
        .unwrap_or(points_awarded as f64 >= max_points as f64 * LEVEL_PASS_THRESHOLD);

    GradeAnswerResponse {
        success: true,
        question_id,
        points_awarded,
        max_points,
        percentage,
        is_correct,
        feedback: reply.feedback.unwrap_or_default(),
        strength_points: reply.strength_points,
        improvement_areas: reply.improvement_areas,
        detailed_analysis: reply.detailed_analysis.unwrap_or_default(),
        graded_at: Utc::now(),
    }
}

fn no_answer(question_id: Option<String>, max_points: u32, language: &str) -> GradeAnswerResponse {
    let feedback = if is_vietnamese(language) {
        "Không có câu trả lời."
    } else {
        "No answer provided."
    };

    GradeAnswerResponse {
        success: true,
        question_id,
        points_awarded: 0,
        max_points,
        percentage: 0.0,
        is_correct: false,
        feedback: feedback.to_string(),
        strength_points: vec![],
        improvement_areas: vec![feedback.to_string()],
        detailed_analysis: feedback.to_string(),
        graded_at: Utc::now(),
    }
}
