//! Question Generator: AI-authored assessment questions for a skill.
//!
//! Requests name question types and languages the way the web client shows them
//! ("Multiple Choice", "Vietnamese"); `validate_request` normalizes them into a
//! `GenerationPlan` before anything reaches the model. Questions come back as
//! loosely structured JSON and are passed through, except that every question is
//! stamped with the requested skill id.

pub mod handlers;
pub mod prompts;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::catalog::SkillCatalog;
use crate::errors::AppError;
use crate::generation::prompts::{build_generation_prompt, SkillFocus, GENERATION_SYSTEM};
use crate::llm_client::{call_json, CompletionOptions, LlmBackend};

const GENERATION_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.7,
    max_tokens: 8192,
};

const MAX_QUESTIONS: u32 = 100;
const MAX_CONTEXT_CHARS: usize = 2000;
const DEFAULT_DIFFICULTY: &str = "medium";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    MultipleChoice,
    MultipleAnswer,
    TrueFalse,
    ShortAnswer,
    LongAnswer,
    CodingChallenge,
    Scenario,
    SituationalJudgment,
    Rating,
}

impl QuestionType {
    const ALL: [QuestionType; 9] = [
        QuestionType::MultipleChoice,
        QuestionType::MultipleAnswer,
        QuestionType::TrueFalse,
        QuestionType::ShortAnswer,
        QuestionType::LongAnswer,
        QuestionType::CodingChallenge,
        QuestionType::Scenario,
        QuestionType::SituationalJudgment,
        QuestionType::Rating,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "MultipleChoice",
            QuestionType::MultipleAnswer => "MultipleAnswer",
            QuestionType::TrueFalse => "TrueFalse",
            QuestionType::ShortAnswer => "ShortAnswer",
            QuestionType::LongAnswer => "LongAnswer",
            QuestionType::CodingChallenge => "CodingChallenge",
            QuestionType::Scenario => "Scenario",
            QuestionType::SituationalJudgment => "SituationalJudgment",
            QuestionType::Rating => "Rating",
        }
    }

    /// Accepts both the stored name ("TrueFalse") and the display name ("True/False").
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().to_ascii_lowercase() == key)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillInfo {
    pub skill_id: String,
    pub skill_name: String,
    #[serde(default)]
    pub skill_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub question_type: Vec<String>,
    pub language: String,
    pub number_of_questions: u32,
    #[serde(default)]
    pub skills: Option<Vec<SkillInfo>>,
    #[serde(default)]
    pub target_proficiency_level: Option<Vec<u8>>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub additional_context: Option<String>,
}

/// A validated, normalized generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    pub question_types: Vec<QuestionType>,
    /// "en" or "vi".
    pub language: String,
    pub number_of_questions: u32,
    /// "easy", "medium" or "hard".
    pub difficulty: String,
    pub target_levels: Vec<u8>,
    pub additional_context: Option<String>,
    /// Only the first requested skill is used.
    pub skill: Option<SkillInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationMetadata {
    pub total_questions: usize,
    pub generation_timestamp: DateTime<Utc>,
    pub ai_model: String,
    pub skill_id: Option<String>,
    pub skill_name: Option<String>,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedQuestions {
    pub questions: Vec<Value>,
    pub metadata: GenerationMetadata,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn invalid(message: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("Invalid request: {message}"))
}

fn normalize_language(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "en" | "english" => Some("en"),
        "vi" | "vietnamese" => Some("vi"),
        _ => None,
    }
}

fn normalize_difficulty(raw: Option<&str>) -> Result<String, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(DEFAULT_DIFFICULTY.to_string());
    };
    match raw.to_ascii_lowercase().as_str() {
        level @ ("easy" | "medium" | "hard") => Ok(level.to_string()),
        _ => Err(invalid(format!("unknown difficulty '{raw}'"))),
    }
}

pub fn validate_request(request: &GenerateQuestionsRequest) -> Result<GenerationPlan, AppError> {
    if request.question_type.is_empty() {
        return Err(invalid("question_type must list at least one type"));
    }
    let question_types = request
        .question_type
        .iter()
        .map(|raw| QuestionType::parse(raw).ok_or_else(|| invalid(format!("unknown question type '{raw}'"))))
        .collect::<Result<Vec<_>, _>>()?;

    let language = normalize_language(&request.language)
        .ok_or_else(|| invalid(format!("unsupported language '{}'", request.language)))?;

    if !(1..=MAX_QUESTIONS).contains(&request.number_of_questions) {
        return Err(invalid(format!(
            "number_of_questions must be between 1 and {MAX_QUESTIONS}"
        )));
    }

    let target_levels = request.target_proficiency_level.clone().unwrap_or_default();
    if let Some(level) = target_levels.iter().find(|l| !(1..=7).contains(*l)) {
        return Err(invalid(format!("target proficiency level {level} is outside 1-7")));
    }

    let additional_context = request
        .additional_context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    if additional_context.is_some_and(|c| c.chars().count() > MAX_CONTEXT_CHARS) {
        return Err(invalid(format!(
            "additional_context must be at most {MAX_CONTEXT_CHARS} characters"
        )));
    }

    Ok(GenerationPlan {
        question_types,
        language: language.to_string(),
        number_of_questions: request.number_of_questions,
        difficulty: normalize_difficulty(request.difficulty.as_deref())?,
        target_levels,
        additional_context: additional_context.map(str::to_string),
        skill: request.skills.as_ref().and_then(|s| s.first().cloned()),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_questions(
    plan: &GenerationPlan,
    catalog: &dyn SkillCatalog,
    llm: &dyn LlmBackend,
) -> Result<GeneratedQuestions, AppError> {
    info!(
        "Generating {} questions ({:?}, lang={})",
        plan.number_of_questions, plan.question_types, plan.language
    );

    let levels = match &plan.skill {
        Some(skill) => {
            let levels = catalog.level_definitions(&skill.skill_id).await?;
            if levels.is_empty() {
                warn!(
                    "No levels found for skill {}, generating without skill data",
                    skill.skill_id
                );
            }
            levels
        }
        None => vec![],
    };
    let focus = plan
        .skill
        .as_ref()
        .filter(|_| !levels.is_empty())
        .map(|skill| SkillFocus {
            skill_id: &skill.skill_id,
            skill_name: &skill.skill_name,
            levels: &levels,
        });

    let prompt = build_generation_prompt(plan, focus.as_ref());
    debug!("Generation prompt built: {} characters", prompt.len());

    let reply: Value = call_json(llm, GENERATION_SYSTEM, &prompt, GENERATION_OPTIONS)
        .await
        .map_err(|e| AppError::Llm(format!("AI generation failed: {e}")))?;

    let mut questions = extract_questions(reply)?;
    if let Some(skill) = &plan.skill {
        for question in questions.iter_mut().filter_map(Value::as_object_mut) {
            stamp_skill_id(question, &skill.skill_id);
        }
    }
    info!("Generated {} questions", questions.len());

    Ok(GeneratedQuestions {
        metadata: GenerationMetadata {
            total_questions: questions.len(),
            generation_timestamp: Utc::now(),
            ai_model: llm.model().to_string(),
            skill_id: focus.as_ref().map(|f| f.skill_id.to_string()),
            skill_name: focus.as_ref().map(|f| f.skill_name.to_string()),
            language: plan.language.clone(),
        },
        questions,
    })
}

/// Accepts `{"questions": [...]}` or a bare array.
fn extract_questions(reply: Value) -> Result<Vec<Value>, AppError> {
    match reply {
        Value::Object(mut object) => match object.remove("questions") {
            Some(Value::Array(questions)) => Ok(questions),
            _ => Err(AppError::Llm(
                "AI generation failed: Response does not contain 'questions' array".to_string(),
            )),
        },
        Value::Array(questions) => {
            warn!("Reply is a bare array, treating it as the question list");
            Ok(questions)
        }
        _ => Err(AppError::Llm(
            "AI generation failed: Response does not contain 'questions' array".to_string(),
        )),
    }
}

/// Fills in `skill_id` when the model left it missing, blank or "null".
fn stamp_skill_id(question: &mut Map<String, Value>, skill_id: &str) {
    let missing = match question.get("skill_id") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty() || s == "null",
        Some(_) => false,
    };
    if missing {
        question.insert("skill_id".to_string(), Value::String(skill_id.to_string()));
    }
}
