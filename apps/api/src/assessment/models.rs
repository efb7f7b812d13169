use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default `max_score` for graded responses that omit it.
const DEFAULT_MAX_SCORE: f64 = 100.0;

// ────────────────────────────────────────────────────────────────────────────
// Wire format (request bodies)
// ────────────────────────────────────────────────────────────────────────────

/// One answered question as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentResponseItem {
    pub question_id: String,
    #[serde(default)]
    pub question_type: String,
    /// Raw SFIA level. Out-of-range values are tolerated here and coerced later.
    #[serde(default = "default_target_level")]
    pub target_level: i64,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
}

fn default_target_level() -> i64 {
    1
}

/// A single-skill assessment submitted for evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateAssessmentRequest {
    pub skill_id: String,
    #[serde(default)]
    pub skill_name: Option<String>,
    pub responses: Vec<AssessmentResponseItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateAssessmentsRequest {
    pub assessments: Vec<EvaluateAssessmentRequest>,
}

// ────────────────────────────────────────────────────────────────────────────
// Domain types
// ────────────────────────────────────────────────────────────────────────────

/// How a response says whether it was answered correctly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CorrectnessSignal {
    /// Objective question types (multiple choice, situational judgment).
    Boolean(bool),
    /// Graded question types, converted to pass/fail against the level threshold.
    Scored { score: f64, max_score: f64 },
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    pub question_id: String,
    pub question_type: String,
    pub target_level: i64,
    pub signal: CorrectnessSignal,
}

impl From<AssessmentResponseItem> for ResponseRecord {
    fn from(item: AssessmentResponseItem) -> Self {
        // An explicit flag wins over any score that came along with it.
        let signal = match (item.is_correct, item.score) {
            (Some(flag), _) => CorrectnessSignal::Boolean(flag),
            (None, Some(score)) => CorrectnessSignal::Scored {
                score,
                max_score: item.max_score.unwrap_or(DEFAULT_MAX_SCORE),
            },
            (None, None) => CorrectnessSignal::Missing,
        };

        Self {
            question_id: item.question_id,
            question_type: item.question_type,
            target_level: item.target_level,
            signal,
        }
    }
}

/// Everything the engine needs to evaluate one skill.
#[derive(Debug, Clone)]
pub struct SkillAssessment {
    pub skill_id: String,
    pub skill_name: Option<String>,
    pub responses: Vec<ResponseRecord>,
}

impl From<EvaluateAssessmentRequest> for SkillAssessment {
    fn from(request: EvaluateAssessmentRequest) -> Self {
        Self {
            skill_id: request.skill_id,
            skill_name: request.skill_name,
            responses: request.responses.into_iter().map(Into::into).collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation output
// ────────────────────────────────────────────────────────────────────────────

/// Per-level aggregate. Present only for levels that received at least one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub total: u32,
    pub correct: u32,
    pub percentage: f64,
    pub passed: bool,
}

/// Level number → aggregate. Serialized with string keys ("1".."7").
pub type LevelResults = BTreeMap<u8, LevelResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStatus {
    Passed,
    Failed,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub level: u8,
    pub status: LevelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDetails {
    pub method: String,
    pub threshold: f64,
    pub start_level: u8,
    pub end_level: u8,
    pub breakdown: Vec<BreakdownEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub skill_id: String,
    pub skill_name: Option<String>,
    /// 0 when the first level of the window was missing or failed.
    pub current_level: u8,
    pub min_defined_level: u8,
    pub max_defined_level: u8,
    pub level_results: LevelResults,
    pub consecutive_levels_passed: u8,
    pub highest_level_with_responses: u8,
    pub total_questions: u32,
    /// Raw score across every answered level, not just the consecutive prefix.
    pub overall_score_percentage: f64,
    pub evaluation_details: EvaluationDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub total_skills: usize,
    pub skills_evaluated: usize,
    pub average_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSkillEvaluation {
    pub results: Vec<EvaluationResult>,
    pub summary: EvaluationSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(json: &str) -> ResponseRecord {
        serde_json::from_str::<AssessmentResponseItem>(json)
            .unwrap()
            .into()
    }

    #[test]
    fn test_flag_takes_precedence_over_score() {
        let record = item(
            r#"{"question_id": "q1", "target_level": 2, "is_correct": false, "score": 90, "max_score": 100}"#,
        );
        assert_eq!(record.signal, CorrectnessSignal::Boolean(false));
    }

    #[test]
    fn test_score_without_max_defaults_to_100() {
        let record = item(r#"{"question_id": "q1", "question_type": "LongAnswer", "target_level": 3, "score": 40}"#);
        assert_eq!(
            record.signal,
            CorrectnessSignal::Scored {
                score: 40.0,
                max_score: 100.0
            }
        );
        assert_eq!(record.question_type, "LongAnswer");
    }

    #[test]
    fn test_null_flag_and_no_score_is_missing() {
        let record = item(r#"{"question_id": "q1", "target_level": 1, "is_correct": null}"#);
        assert_eq!(record.signal, CorrectnessSignal::Missing);
    }

    #[test]
    fn test_out_of_range_level_survives_parsing() {
        let record = item(r#"{"question_id": "q1", "target_level": 12, "is_correct": true}"#);
        assert_eq!(record.target_level, 12);
    }

    #[test]
    fn test_level_results_serialize_with_string_keys() {
        let mut results = LevelResults::new();
        results.insert(
            2,
            LevelResult {
                total: 5,
                correct: 4,
                percentage: 80.0,
                passed: true,
            },
        );
        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(value["2"]["correct"], 4);
        assert_eq!(value["2"]["passed"], true);
    }

    #[test]
    fn test_no_data_status_is_snake_case() {
        let json = serde_json::to_string(&LevelStatus::NoData).unwrap();
        assert_eq!(json, r#""no_data""#);
    }
}
