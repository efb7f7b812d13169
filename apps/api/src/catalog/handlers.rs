use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::catalog::{LevelDefinition, SkillSummary};
use crate::errors::AppError;
use crate::state::AppState;

pub const API_VERSION: &str = "v2";

#[derive(Serialize)]
pub struct SkillListResponse {
    pub success: bool,
    pub skills: Vec<SkillSummary>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct SkillLevelsResponse {
    pub success: bool,
    pub skill_id: String,
    pub levels: Vec<LevelDefinition>,
}

#[derive(Serialize)]
pub struct CatalogStats {
    pub total_skills: usize,
    pub total_level_definitions: i64,
    pub sfia_levels: &'static str,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: CatalogStats,
}

/// GET /api/v2/health
///
/// Always 200. A database failure is reported in the body as `unhealthy`.
pub async fn handle_catalog_health(State(state): State<AppState>) -> Json<Value> {
    match state.catalog.level_definition_count().await {
        Ok(count) => Json(json!({
            "status": "healthy",
            "api_version": API_VERSION,
            "database": "connected",
            "total_definitions": count,
        })),
        Err(e) => {
            error!("Health check failed: {e}");
            Json(json!({
                "status": "unhealthy",
                "api_version": API_VERSION,
                "database": "disconnected",
                "error": e.to_string(),
            }))
        }
    }
}

/// GET /api/v2/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
) -> Result<Json<SkillListResponse>, AppError> {
    let skills = state.catalog.list_skills().await?;
    Ok(Json(SkillListResponse {
        success: true,
        total: skills.len(),
        skills,
    }))
}

/// GET /api/v2/skills/:skill_id/levels
pub async fn handle_skill_levels(
    State(state): State<AppState>,
    Path(skill_id): Path<String>,
) -> Result<Json<SkillLevelsResponse>, AppError> {
    let levels = state.catalog.level_definitions(&skill_id).await?;
    if levels.is_empty() {
        return Err(AppError::NotFound(format!(
            "No levels found for skill: {skill_id}"
        )));
    }
    Ok(Json(SkillLevelsResponse {
        success: true,
        skill_id,
        levels,
    }))
}

/// GET /api/v2/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let total_skills = state.catalog.list_skills().await?.len();
    let total_level_definitions = state.catalog.level_definition_count().await?;
    Ok(Json(StatsResponse {
        success: true,
        stats: CatalogStats {
            total_skills,
            total_level_definitions,
            sfia_levels: "1-7",
        },
    }))
}
