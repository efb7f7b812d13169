use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::gaps::{
    analyze_gap, analyze_gaps, resolve_context, validate_levels, GapAnalysis, GapSubject,
    MultipleGapsRequest, MultipleGapsResponse, SkillGapRequest,
};
use crate::state::AppState;

/// POST /api/v2/analyze-gap
pub async fn handle_analyze_gap(
    State(state): State<AppState>,
    AppJson(req): AppJson<SkillGapRequest>,
) -> Result<Json<GapAnalysis>, AppError> {
    validate_levels(req.current_level, req.required_level)?;
    let context =
        resolve_context(state.catalog.as_ref(), &req.employee_id, req.job_role.as_deref()).await?;
    let language = req.language.as_deref().unwrap_or("en");

    let analysis = analyze_gap(&context, &GapSubject::from(&req), language, state.llm.as_ref()).await?;
    Ok(Json(analysis))
}

/// POST /api/v2/analyze-gaps
pub async fn handle_analyze_gaps(
    State(state): State<AppState>,
    AppJson(req): AppJson<MultipleGapsRequest>,
) -> Result<Json<MultipleGapsResponse>, AppError> {
    let context =
        resolve_context(state.catalog.as_ref(), &req.employee_id, req.job_role.as_deref()).await?;
    let language = req.language.as_deref().unwrap_or("en");

    let response = analyze_gaps(&context, &req.gaps, language, state.llm.as_ref()).await;
    Ok(Json(response))
}
