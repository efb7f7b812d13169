use axum::{extract::State, Json};
use tracing::info;

use crate::assessment::coordinator::{evaluate_skills, evaluate_with_catalog};
use crate::assessment::models::{
    EvaluateAssessmentRequest, EvaluateAssessmentsRequest, EvaluationResult,
    MultiSkillEvaluation, SkillAssessment,
};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

fn validate_assessment(request: &EvaluateAssessmentRequest) -> Result<(), AppError> {
    if request.skill_id.trim().is_empty() {
        return Err(AppError::Validation("skill_id cannot be empty".to_string()));
    }
    if request.responses.is_empty() {
        return Err(AppError::Validation(format!(
            "At least one response is required for skill {}",
            request.skill_id
        )));
    }
    Ok(())
}

/// POST /api/v2/evaluate-assessment
pub async fn handle_evaluate_assessment(
    State(state): State<AppState>,
    AppJson(req): AppJson<EvaluateAssessmentRequest>,
) -> Result<Json<EvaluationResult>, AppError> {
    validate_assessment(&req)?;
    info!(
        "Evaluating assessment for skill {} with {} responses",
        req.skill_id,
        req.responses.len()
    );

    let assessment = SkillAssessment::from(req);
    let result = evaluate_with_catalog(state.catalog.as_ref(), &assessment).await;
    Ok(Json(result))
}

/// POST /api/v2/evaluate-assessments
///
/// Every skill is evaluated independently; one skill's catalog failure does not
/// affect the others.
pub async fn handle_evaluate_assessments(
    State(state): State<AppState>,
    AppJson(req): AppJson<EvaluateAssessmentsRequest>,
) -> Result<Json<MultiSkillEvaluation>, AppError> {
    if req.assessments.is_empty() {
        return Err(AppError::Validation(
            "At least one assessment is required".to_string(),
        ));
    }
    for assessment in &req.assessments {
        validate_assessment(assessment)?;
    }

    let assessments: Vec<SkillAssessment> =
        req.assessments.into_iter().map(SkillAssessment::from).collect();
    let evaluation = evaluate_skills(state.catalog.as_ref(), &assessments).await;
    Ok(Json(evaluation))
}
