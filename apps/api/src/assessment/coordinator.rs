//! Multi-Skill Coordinator: evaluates several skills independently and summarizes them.

use tracing::{info, warn};

use crate::assessment::aggregator::round_one_decimal;
use crate::assessment::models::{
    EvaluationResult, EvaluationSummary, MultiSkillEvaluation, SkillAssessment,
};
use crate::assessment::resolver::evaluate_assessment;
use crate::catalog::SkillCatalog;

/// Looks up the levels a skill is defined at.
///
/// A catalog failure is logged and treated as "unknown" so the caller falls back
/// to the response-derived window instead of failing the evaluation.
pub async fn defined_levels_for(catalog: &dyn SkillCatalog, skill_id: &str) -> Option<Vec<u8>> {
    match catalog.levels_for_skill(skill_id).await {
        Ok(Some(levels)) if !levels.is_empty() => {
            info!("Skill {skill_id} has defined levels: {levels:?}");
            Some(levels)
        }
        Ok(_) => None,
        Err(e) => {
            warn!("Could not fetch levels for skill {skill_id}: {e}");
            None
        }
    }
}

/// Evaluates one skill against its catalog-defined window.
pub async fn evaluate_with_catalog(
    catalog: &dyn SkillCatalog,
    assessment: &SkillAssessment,
) -> EvaluationResult {
    let defined_levels = defined_levels_for(catalog, &assessment.skill_id).await;
    evaluate_assessment(assessment, defined_levels.as_deref())
}

pub async fn evaluate_skills(
    catalog: &dyn SkillCatalog,
    assessments: &[SkillAssessment],
) -> MultiSkillEvaluation {
    let mut results = Vec::with_capacity(assessments.len());
    for assessment in assessments {
        results.push(evaluate_with_catalog(catalog, assessment).await);
    }
    summarize(results)
}

/// Builds the batch summary. Skills stuck at level 0 count toward `total_skills`
/// but not toward the average.
pub fn summarize(results: Vec<EvaluationResult>) -> MultiSkillEvaluation {
    let achieved: Vec<u8> = results
        .iter()
        .map(|r| r.current_level)
        .filter(|&level| level > 0)
        .collect();

    let average_level = if achieved.is_empty() {
        0.0
    } else {
        let sum: u32 = achieved.iter().map(|&l| l as u32).sum();
        round_one_decimal(sum as f64 / achieved.len() as f64)
    };

    let summary = EvaluationSummary {
        total_skills: results.len(),
        skills_evaluated: achieved.len(),
        average_level,
    };

    info!(
        "Multiple evaluations complete: {} skills, avg level = {}",
        summary.total_skills, summary.average_level
    );

    MultiSkillEvaluation { results, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::models::{CorrectnessSignal, ResponseRecord};
    use crate::catalog::memory::InMemorySkillCatalog;

    fn assessment(skill_id: &str, levels: &[(i64, usize, usize)]) -> SkillAssessment {
        SkillAssessment {
            skill_id: skill_id.to_string(),
            skill_name: None,
            responses: levels
                .iter()
                .flat_map(|&(level, correct, total)| {
                    (0..total).map(move |i| ResponseRecord {
                        question_id: format!("{level}-{i}"),
                        question_type: "MultipleChoice".to_string(),
                        target_level: level,
                        signal: CorrectnessSignal::Boolean(i < correct),
                    })
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_two_skills_average_only_counts_achieved() {
        let catalog = InMemorySkillCatalog::default();
        let batch = vec![
            assessment("a", &[(1, 4, 5), (2, 4, 5), (3, 4, 5)]),
            assessment("b", &[(1, 1, 5)]),
        ];

        let evaluation = evaluate_skills(&catalog, &batch).await;
        assert_eq!(evaluation.results[0].current_level, 3);
        assert_eq!(evaluation.results[1].current_level, 0);
        assert_eq!(evaluation.summary.total_skills, 2);
        assert_eq!(evaluation.summary.skills_evaluated, 1);
        assert_eq!(evaluation.summary.average_level, 3.0);
    }

    #[tokio::test]
    async fn test_average_rounds_to_one_decimal() {
        let catalog = InMemorySkillCatalog::default();
        let batch = vec![
            assessment("a", &[(1, 5, 5)]),
            assessment("b", &[(1, 5, 5), (2, 5, 5)]),
            assessment("c", &[(1, 5, 5), (2, 5, 5)]),
        ];
        let evaluation = evaluate_skills(&catalog, &batch).await;
        // (1 + 2 + 2) / 3 = 1.666…
        assert_eq!(evaluation.summary.average_level, 1.7);
    }

    #[tokio::test]
    async fn test_nothing_achieved_averages_zero() {
        let catalog = InMemorySkillCatalog::default();
        let batch = vec![assessment("a", &[(1, 0, 5)]), assessment("b", &[])];
        let evaluation = evaluate_skills(&catalog, &batch).await;
        assert_eq!(evaluation.summary.skills_evaluated, 0);
        assert_eq!(evaluation.summary.average_level, 0.0);
    }

    #[tokio::test]
    async fn test_catalog_levels_shape_the_window() {
        let catalog = InMemorySkillCatalog::default().with_levels("a", &[4, 5, 6]);
        let batch = vec![assessment("a", &[(4, 4, 5), (6, 5, 5)])];
        let evaluation = evaluate_skills(&catalog, &batch).await;
        assert_eq!(evaluation.results[0].min_defined_level, 4);
        assert_eq!(evaluation.results[0].current_level, 4);
    }

    #[tokio::test]
    async fn test_catalog_failure_falls_back_per_skill() {
        let catalog = InMemorySkillCatalog::default()
            .with_levels("b", &[2, 3])
            .failing_for("a");
        let batch = vec![
            assessment("a", &[(1, 5, 5), (2, 5, 5)]),
            assessment("b", &[(2, 5, 5), (3, 5, 5)]),
        ];

        let evaluation = evaluate_skills(&catalog, &batch).await;
        assert_eq!(evaluation.results.len(), 2);
        assert_eq!(evaluation.results[0].min_defined_level, 1);
        assert_eq!(evaluation.results[0].current_level, 2);
        assert_eq!(evaluation.results[1].min_defined_level, 2);
        assert_eq!(evaluation.results[1].current_level, 3);
        assert_eq!(evaluation.summary.average_level, 2.5);
    }

    #[tokio::test]
    async fn test_defined_levels_for_treats_empty_as_unknown() {
        let catalog = InMemorySkillCatalog::default().with_levels("a", &[]);
        assert_eq!(defined_levels_for(&catalog, "a").await, None);
        assert_eq!(defined_levels_for(&catalog, "missing").await, None);
    }
}
