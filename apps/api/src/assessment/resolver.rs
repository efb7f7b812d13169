//! Consecutive-Level Resolver: turns per-level results into a single competency level.
//!
//! A level is awarded only if every level below it, down to the skill's lowest
//! defined level, also passed. The walk stops at the first level that failed or
//! has no responses; higher levels are never examined after that point.

use tracing::{info, warn};

use crate::assessment::aggregator::{aggregate, LevelAggregate, MAX_LEVEL, MIN_LEVEL};
use crate::assessment::classifier::LEVEL_PASS_THRESHOLD;
use crate::assessment::models::{
    BreakdownEntry, EvaluationDetails, EvaluationResult, LevelResults, LevelStatus,
    SkillAssessment,
};

pub const EVALUATION_METHOD: &str = "bottom_up_consecutive";

/// Inclusive `[min, max]` window the consecutive check runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelWindow {
    pub min: u8,
    pub max: u8,
}

impl Default for LevelWindow {
    fn default() -> Self {
        Self {
            min: MIN_LEVEL,
            max: MAX_LEVEL,
        }
    }
}

impl LevelWindow {
    /// Window from an explicit list of defined levels. `None` if the list has no
    /// usable level in 1..=7.
    pub fn from_defined_levels(levels: &[u8]) -> Option<Self> {
        let mut usable = levels
            .iter()
            .copied()
            .filter(|l| (MIN_LEVEL..=MAX_LEVEL).contains(l));
        let first = usable.next()?;
        let (min, max) = usable.fold((first, first), |(lo, hi), l| (lo.min(l), hi.max(l)));
        Some(Self { min, max })
    }

    /// Priority: catalog-defined levels, then levels seen in responses, then 1..=7.
    pub fn resolve(defined_levels: Option<&[u8]>, aggregate: &LevelAggregate) -> Self {
        if let Some(window) = defined_levels.and_then(Self::from_defined_levels) {
            return window;
        }
        aggregate
            .response_bounds()
            .map(|(min, max)| Self { min, max })
            .unwrap_or_default()
    }

    fn span(&self) -> usize {
        (self.max - self.min) as usize + 1
    }
}

/// Outcome of walking a window from its bottom level upward.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsecutiveOutcome {
    pub current_level: u8,
    pub consecutive_passed: u8,
    pub breakdown: Vec<BreakdownEntry>,
}

pub fn walk_consecutive(level_results: &LevelResults, window: LevelWindow) -> ConsecutiveOutcome {
    let threshold = LEVEL_PASS_THRESHOLD * 100.0;
    let mut current_level = 0;
    let mut consecutive_passed = 0;
    let mut breakdown = Vec::with_capacity(window.span());

    for level in window.min..=window.max {
        let Some(result) = level_results.get(&level) else {
            breakdown.push(BreakdownEntry {
                level,
                status: LevelStatus::NoData,
                percentage: None,
                message: format!("No questions at Level {level}"),
            });
            break;
        };

        if result.passed {
            current_level = level;
            consecutive_passed += 1;
            breakdown.push(BreakdownEntry {
                level,
                status: LevelStatus::Passed,
                percentage: Some(result.percentage),
                message: format!(
                    "Level {level} passed ({:.1}% >= {threshold:.1}%)",
                    result.percentage
                ),
            });
        } else {
            breakdown.push(BreakdownEntry {
                level,
                status: LevelStatus::Failed,
                percentage: Some(result.percentage),
                message: format!(
                    "Level {level} failed ({:.1}% < {threshold:.1}%)",
                    result.percentage
                ),
            });
            break;
        }
    }

    ConsecutiveOutcome {
        current_level,
        consecutive_passed,
        breakdown,
    }
}

/// Evaluates one skill's responses and determines its current level.
///
/// `defined_levels` are the levels the catalog defines for the skill; when absent
/// or empty the window is derived from the responses themselves.
pub fn evaluate_assessment(
    assessment: &SkillAssessment,
    defined_levels: Option<&[u8]>,
) -> EvaluationResult {
    if assessment.responses.is_empty() {
        warn!(skill_id = %assessment.skill_id, "No responses provided for evaluation");
        return empty_result(assessment, defined_levels);
    }

    let aggregate = aggregate(&assessment.responses);
    let window = LevelWindow::resolve(defined_levels, &aggregate);

    info!(
        skill_id = %assessment.skill_id,
        "Consecutive check from Level {} to {} (defined_levels={:?}, response_levels={:?})",
        window.min,
        window.max,
        defined_levels,
        aggregate.level_results.keys().collect::<Vec<_>>()
    );

    let outcome = walk_consecutive(&aggregate.level_results, window);
    let highest_level_with_responses = aggregate
        .response_bounds()
        .map(|(_, max)| max)
        .unwrap_or(0);

    EvaluationResult {
        skill_id: assessment.skill_id.clone(),
        skill_name: assessment.skill_name.clone(),
        current_level: outcome.current_level,
        min_defined_level: window.min,
        max_defined_level: window.max,
        consecutive_levels_passed: outcome.consecutive_passed,
        highest_level_with_responses,
        total_questions: aggregate.total_questions,
        overall_score_percentage: aggregate.overall_percentage(),
        evaluation_details: EvaluationDetails {
            method: EVALUATION_METHOD.to_string(),
            threshold: LEVEL_PASS_THRESHOLD * 100.0,
            start_level: window.min,
            end_level: window.max,
            breakdown: outcome.breakdown,
            message: None,
        },
        level_results: aggregate.level_results,
    }
}

fn empty_result(assessment: &SkillAssessment, defined_levels: Option<&[u8]>) -> EvaluationResult {
    let window = defined_levels
        .and_then(LevelWindow::from_defined_levels)
        .unwrap_or_default();

    EvaluationResult {
        skill_id: assessment.skill_id.clone(),
        skill_name: assessment.skill_name.clone(),
        current_level: 0,
        min_defined_level: window.min,
        max_defined_level: window.max,
        level_results: LevelResults::new(),
        consecutive_levels_passed: 0,
        highest_level_with_responses: 0,
        total_questions: 0,
        overall_score_percentage: 0.0,
        evaluation_details: EvaluationDetails {
            method: EVALUATION_METHOD.to_string(),
            threshold: LEVEL_PASS_THRESHOLD * 100.0,
            start_level: window.min,
            end_level: window.max,
            breakdown: vec![],
            message: Some("No responses to evaluate".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::models::{CorrectnessSignal, ResponseRecord};

    fn responses_at(level: i64, correct: usize, total: usize) -> Vec<ResponseRecord> {
        (0..total)
            .map(|i| ResponseRecord {
                question_id: format!("L{level}-q{i}"),
                question_type: "MultipleChoice".to_string(),
                target_level: level,
                signal: CorrectnessSignal::Boolean(i < correct),
            })
            .collect()
    }

    fn assessment(levels: &[(i64, usize, usize)]) -> SkillAssessment {
        SkillAssessment {
            skill_id: "skill-1".to_string(),
            skill_name: Some("Programming".to_string()),
            responses: levels
                .iter()
                .flat_map(|&(level, correct, total)| responses_at(level, correct, total))
                .collect(),
        }
    }

    /// Checks the structural invariants every evaluation must satisfy.
    fn assert_invariants(result: &EvaluationResult) {
        assert!(result.current_level <= result.max_defined_level);
        if result.current_level > 0 {
            for level in result.min_defined_level..=result.current_level {
                assert!(result.level_results[&level].passed, "level {level} not passed");
            }
        }
        let expected_consecutive = if result.current_level >= result.min_defined_level {
            result.current_level - result.min_defined_level + 1
        } else {
            0
        };
        assert_eq!(result.consecutive_levels_passed, expected_consecutive);
        let span = (result.max_defined_level - result.min_defined_level) as usize + 1;
        assert!(result.evaluation_details.breakdown.len() <= span);
    }

    #[test]
    fn test_three_consecutive_passes() {
        let result = evaluate_assessment(&assessment(&[(1, 4, 5), (2, 4, 5), (3, 4, 5)]), None);
        assert_eq!(result.current_level, 3);
        assert_eq!(result.consecutive_levels_passed, 3);
        let breakdown = &result.evaluation_details.breakdown;
        assert_eq!(breakdown.len(), 3);
        assert!(breakdown.iter().all(|b| b.status == LevelStatus::Passed));
        assert_invariants(&result);
    }

    #[test]
    fn test_failure_blocks_higher_passes() {
        let result = evaluate_assessment(&assessment(&[(1, 5, 5), (2, 2, 5), (3, 5, 5)]), None);
        assert_eq!(result.current_level, 1);
        assert_eq!(result.consecutive_levels_passed, 1);

        let breakdown = &result.evaluation_details.breakdown;
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[1].status, LevelStatus::Failed);
        assert_eq!(breakdown[1].percentage, Some(40.0));
        assert_eq!(breakdown[1].message, "Level 2 failed (40.0% < 70.0%)");

        // Level 3 is still aggregated and counted in the overall score.
        assert!(result.level_results[&3].passed);
        assert_eq!(result.overall_score_percentage, 80.0);
        assert_eq!(result.highest_level_with_responses, 3);
        assert_invariants(&result);
    }

    #[test]
    fn test_first_level_failed_gives_zero() {
        let result = evaluate_assessment(&assessment(&[(1, 3, 5)]), None);
        assert_eq!(result.current_level, 0);
        assert_eq!(result.consecutive_levels_passed, 0);
        assert_eq!(result.evaluation_details.breakdown.len(), 1);
        assert_invariants(&result);
    }

    #[test]
    fn test_defined_window_starts_above_level_one() {
        let result = evaluate_assessment(&assessment(&[(4, 4, 5), (6, 5, 5)]), Some(&[4, 5, 6]));
        assert_eq!(result.min_defined_level, 4);
        assert_eq!(result.max_defined_level, 6);
        assert_eq!(result.current_level, 4);
        assert_eq!(result.consecutive_levels_passed, 1);

        let breakdown = &result.evaluation_details.breakdown;
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].message, "Level 4 passed (80.0% >= 70.0%)");
        assert_eq!(breakdown[1].status, LevelStatus::NoData);
        assert_eq!(breakdown[1].percentage, None);
        assert_eq!(breakdown[1].message, "No questions at Level 5");
        assert_invariants(&result);
    }

    #[test]
    fn test_gap_is_never_skipped() {
        let result = evaluate_assessment(
            &assessment(&[(1, 5, 5), (3, 5, 5), (4, 5, 5), (5, 5, 5)]),
            None,
        );
        assert_eq!(result.current_level, 1);
        assert_eq!(
            result.evaluation_details.breakdown.last().map(|b| b.status),
            Some(LevelStatus::NoData)
        );
        assert_invariants(&result);
    }

    #[test]
    fn test_window_derived_from_responses() {
        let result = evaluate_assessment(&assessment(&[(3, 5, 5), (4, 4, 5)]), None);
        assert_eq!(result.min_defined_level, 3);
        assert_eq!(result.max_defined_level, 4);
        assert_eq!(result.current_level, 4);
        assert_eq!(result.consecutive_levels_passed, 2);
        assert_invariants(&result);
    }

    #[test]
    fn test_empty_defined_levels_fall_back_to_responses() {
        let result = evaluate_assessment(&assessment(&[(2, 5, 5)]), Some(&[]));
        assert_eq!(result.min_defined_level, 2);
        assert_eq!(result.current_level, 2);
    }

    #[test]
    fn test_defined_levels_below_responses_give_zero() {
        let result = evaluate_assessment(&assessment(&[(3, 5, 5)]), Some(&[2, 3]));
        assert_eq!(result.current_level, 0);
        assert_eq!(
            result.evaluation_details.breakdown[0].status,
            LevelStatus::NoData
        );
        assert_invariants(&result);
    }

    #[test]
    fn test_responses_above_window_are_ignored_for_level() {
        let result = evaluate_assessment(&assessment(&[(1, 5, 5), (2, 5, 5), (3, 5, 5)]), Some(&[1, 2]));
        assert_eq!(result.current_level, 2);
        assert_eq!(result.highest_level_with_responses, 3);
        assert_invariants(&result);
    }

    #[test]
    fn test_empty_responses() {
        let empty = SkillAssessment {
            skill_id: "skill-1".to_string(),
            skill_name: None,
            responses: vec![],
        };
        let result = evaluate_assessment(&empty, None);
        assert_eq!(result.current_level, 0);
        assert!(result.level_results.is_empty());
        assert!(result.evaluation_details.breakdown.is_empty());
        assert_eq!(result.min_defined_level, 1);
        assert_eq!(result.max_defined_level, 7);
        assert_eq!(
            result.evaluation_details.message.as_deref(),
            Some("No responses to evaluate")
        );

        let scoped = evaluate_assessment(&empty, Some(&[3, 5]));
        assert_eq!(scoped.min_defined_level, 3);
        assert_eq!(scoped.max_defined_level, 5);
    }

    #[test]
    fn test_boundary_inclusive_at_seventy() {
        let result = evaluate_assessment(&assessment(&[(1, 7, 10)]), None);
        assert_eq!(result.current_level, 1);
        let result = evaluate_assessment(&assessment(&[(1, 699, 1000)]), None);
        assert_eq!(result.current_level, 0);
    }

    #[test]
    fn test_graded_responses_at_threshold() {
        let graded = |score: f64| ResponseRecord {
            question_id: "g".to_string(),
            question_type: "LongAnswer".to_string(),
            target_level: 2,
            signal: CorrectnessSignal::Scored {
                score,
                max_score: 100.0,
            },
        };
        let passing = SkillAssessment {
            skill_id: "s".to_string(),
            skill_name: None,
            responses: vec![graded(70.0)],
        };
        assert_eq!(evaluate_assessment(&passing, None).current_level, 2);

        let failing = SkillAssessment {
            responses: vec![graded(69.0)],
            ..passing
        };
        assert_eq!(evaluate_assessment(&failing, None).current_level, 0);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let input = assessment(&[(1, 5, 5), (2, 3, 5), (4, 1, 2)]);
        let first = serde_json::to_string(&evaluate_assessment(&input, Some(&[1, 2, 3, 4]))).unwrap();
        let second = serde_json::to_string(&evaluate_assessment(&input, Some(&[1, 2, 3, 4]))).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_details_shape() {
        let result = evaluate_assessment(&assessment(&[(1, 5, 5)]), None);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["evaluation_details"]["method"], "bottom_up_consecutive");
        assert_eq!(value["evaluation_details"]["threshold"], 70.0);
        assert_eq!(value["level_results"]["1"]["percentage"], 100.0);
        assert!(value["evaluation_details"].get("message").is_none());
    }

    #[test]
    fn test_window_from_defined_levels_ignores_out_of_range() {
        assert_eq!(
            LevelWindow::from_defined_levels(&[0, 3, 9, 5]),
            Some(LevelWindow { min: 3, max: 5 })
        );
        assert_eq!(LevelWindow::from_defined_levels(&[0, 8]), None);
    }
}
