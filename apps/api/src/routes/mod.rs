pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::catalog::handlers as catalog;
use crate::gaps::handlers as gaps;
use crate::generation::handlers as generation;
use crate::grading::handlers as grading;
use crate::learning::handlers as learning;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route("/api/v2/health", get(catalog::handle_catalog_health))
        .route("/api/v2/skills", get(catalog::handle_list_skills))
        .route(
            "/api/v2/skills/:skill_id/levels",
            get(catalog::handle_skill_levels),
        )
        .route("/api/v2/stats", get(catalog::handle_stats))
        // Evaluation
        .route(
            "/api/v2/evaluate-assessment",
            post(assessment::handle_evaluate_assessment),
        )
        .route(
            "/api/v2/evaluate-assessments",
            post(assessment::handle_evaluate_assessments),
        )
        // AI
        .route("/api/v2/grade-answer", post(grading::handle_grade_answer))
        .route("/api/v2/analyze-gap", post(gaps::handle_analyze_gap))
        .route("/api/v2/analyze-gaps", post(gaps::handle_analyze_gaps))
        .route(
            "/api/v2/generate-questions",
            post(generation::handle_generate_questions),
        )
        .route(
            "/api/v2/generate-learning-path",
            post(learning::handle_generate_learning_path),
        )
        .route(
            "/api/v2/generate-learning-paths",
            post(learning::handle_generate_learning_paths),
        )
        .route("/api/v2/rank-resources", post(learning::handle_rank_resources))
        .with_state(state)
}
