use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::generation::{generate_questions, validate_request, GenerateQuestionsRequest, GeneratedQuestions};
use crate::state::AppState;

/// POST /api/v2/generate-questions
///
/// Generates assessment questions, grounded in the catalog's level definitions
/// when a known skill is given.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateQuestionsRequest>,
) -> Result<Json<GeneratedQuestions>, AppError> {
    let plan = validate_request(&request)?;
    let generated = generate_questions(&plan, state.catalog.as_ref(), state.llm.as_ref()).await?;
    Ok(Json(generated))
}
