use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::gaps::resolve_context;
use crate::learning::{
    generate_learning_path, generate_learning_paths, rank_resources, validate_path_levels,
    validate_time_constraint, GenerateLearningPathRequest, GenerateLearningPathsRequest,
    LearningPath, MultiplePathsResponse, PathOptions, PathSubject, RankResourcesRequest,
    ResourceRanking,
};
use crate::state::AppState;

/// POST /api/v2/generate-learning-path
pub async fn handle_generate_learning_path(
    State(state): State<AppState>,
    AppJson(req): AppJson<GenerateLearningPathRequest>,
) -> Result<Json<LearningPath>, AppError> {
    validate_path_levels(req.current_level, req.target_level)?;
    validate_time_constraint(req.time_constraint_months)?;
    let context = resolve_context(state.catalog.as_ref(), &req.employee_id, None).await?;

    let options = PathOptions {
        employee_name: &context.employee_name,
        time_constraint_months: req.time_constraint_months,
        language: req.language.as_deref().unwrap_or("en"),
    };
    let path = generate_learning_path(
        &PathSubject::from(&req),
        req.available_resources.as_deref().unwrap_or_default(),
        options,
        state.catalog.as_ref(),
        state.llm.as_ref(),
    )
    .await?;
    Ok(Json(path))
}

/// POST /api/v2/generate-learning-paths
pub async fn handle_generate_learning_paths(
    State(state): State<AppState>,
    AppJson(req): AppJson<GenerateLearningPathsRequest>,
) -> Result<Json<MultiplePathsResponse>, AppError> {
    if req.skills.is_empty() {
        return Err(AppError::Validation(
            "At least one skill is required".to_string(),
        ));
    }
    validate_time_constraint(req.time_constraint_months)?;
    let context = resolve_context(state.catalog.as_ref(), &req.employee_id, None).await?;

    let options = PathOptions {
        employee_name: &context.employee_name,
        time_constraint_months: req.time_constraint_months,
        language: req.language.as_deref().unwrap_or("en"),
    };
    let response =
        generate_learning_paths(&req.skills, options, state.catalog.as_ref(), state.llm.as_ref())
            .await;
    Ok(Json(response))
}

/// POST /api/v2/rank-resources
pub async fn handle_rank_resources(
    State(state): State<AppState>,
    AppJson(req): AppJson<RankResourcesRequest>,
) -> Result<Json<ResourceRanking>, AppError> {
    validate_path_levels(req.current_level, req.target_level)?;
    let ranking = rank_resources(&req, state.llm.as_ref()).await?;
    Ok(Json(ranking))
}
