use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::grading::{grade_answer, GradeAnswerRequest, GradeAnswerResponse};
use crate::state::AppState;

/// POST /api/v2/grade-answer
///
/// Grades one submitted answer with the LLM and returns points plus feedback.
pub async fn handle_grade_answer(
    State(state): State<AppState>,
    AppJson(request): AppJson<GradeAnswerRequest>,
) -> Result<Json<GradeAnswerResponse>, AppError> {
    let graded = grade_answer(&request, state.llm.as_ref()).await?;
    Ok(Json(graded))
}
