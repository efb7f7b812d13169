//! Learning Paths: AI-designed development plans and resource ranking.
//!
//! The model writes the narrative of a path (title, milestones, rationale). The
//! learning items themselves always come from the catalog's course list for the
//! skill, filtered to the employee's level range, so every item links to a real
//! course.

pub mod courses;
pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::catalog::SkillCatalog;
use crate::errors::AppError;
use crate::learning::courses::{course_items, LearningItem};
use crate::learning::prompts::{
    build_learning_path_prompt, build_ranking_prompt, LEARNING_PATH_SYSTEM, RANKING_SYSTEM,
};
use crate::llm_client::prompts::is_vietnamese;
use crate::llm_client::reply::{lenient_count, lenient_number};
use crate::llm_client::{call_json, CompletionOptions, LlmBackend};

const PATH_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.5,
    max_tokens: 2048,
};

const RANKING_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.3,
    max_tokens: 1024,
};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub from_level: Option<u8>,
    #[serde(default)]
    pub to_level: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateLearningPathRequest {
    pub employee_id: String,
    #[serde(default)]
    pub skill_id: Option<String>,
    pub skill_name: String,
    pub skill_code: String,
    pub current_level: u8,
    pub target_level: u8,
    #[serde(default)]
    pub skill_description: Option<String>,
    #[serde(default)]
    pub available_resources: Option<Vec<LearningResource>>,
    #[serde(default)]
    pub time_constraint_months: Option<u8>,
    #[serde(default)]
    pub language: Option<String>,
}

/// The skill a path is built for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathSubject {
    /// Used to look up catalog courses. Without it the path has no items.
    #[serde(default)]
    pub skill_id: Option<String>,
    pub skill_name: String,
    pub skill_code: String,
    pub current_level: u8,
    pub target_level: u8,
    #[serde(default)]
    pub skill_description: Option<String>,
}

impl From<&GenerateLearningPathRequest> for PathSubject {
    fn from(request: &GenerateLearningPathRequest) -> Self {
        Self {
            skill_id: request.skill_id.clone(),
            skill_name: request.skill_name.clone(),
            skill_code: request.skill_code.clone(),
            current_level: request.current_level,
            target_level: request.target_level,
            skill_description: request.skill_description.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateLearningPathsRequest {
    pub employee_id: String,
    pub skills: Vec<PathSubject>,
    #[serde(default)]
    pub time_constraint_months: Option<u8>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankResourcesRequest {
    pub skill_name: String,
    pub skill_code: String,
    pub current_level: u8,
    pub target_level: u8,
    pub resources: Vec<LearningResource>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(default, deserialize_with = "lenient_count")]
    pub after_item: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub expected_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningPath {
    pub success: bool,
    pub path_title: String,
    pub path_description: String,
    pub estimated_total_hours: u32,
    pub estimated_duration_weeks: u32,
    pub learning_items: Vec<LearningItem>,
    pub milestones: Vec<Milestone>,
    pub ai_rationale: String,
    pub key_success_factors: Vec<String>,
    pub potential_challenges: Vec<String>,
}

/// Result for one skill of a multi-skill request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathOutcome {
    Generated {
        skill_id: Option<String>,
        skill_name: String,
        skill_code: String,
        #[serde(flatten)]
        path: LearningPath,
    },
    Failed {
        skill_id: Option<String>,
        skill_name: String,
        skill_code: String,
        success: bool,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiplePathsResponse {
    pub success: bool,
    pub learning_paths: Vec<PathOutcome>,
    pub overall_summary: String,
    pub recommended_learning_order: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResource {
    #[serde(default)]
    pub resource_id: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub rank: u32,
    #[serde(default, deserialize_with = "lenient_number")]
    pub relevance_score: Option<f64>,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRanking {
    pub success: bool,
    pub ranked_resources: Vec<RankedResource>,
    pub top_recommendations: Vec<String>,
    pub coverage_assessment: String,
    pub gaps_in_resources: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PathReply {
    #[serde(default)]
    path_title: String,
    #[serde(default)]
    path_description: String,
    #[serde(default, deserialize_with = "lenient_count")]
    estimated_total_hours: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    estimated_duration_weeks: u32,
    #[serde(default)]
    milestones: Vec<Milestone>,
    #[serde(default)]
    ai_rationale: String,
    #[serde(default)]
    key_success_factors: Vec<String>,
    #[serde(default)]
    potential_challenges: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RankingReply {
    #[serde(default)]
    ranked_resources: Vec<RankedResource>,
    #[serde(default)]
    top_recommendations: Vec<String>,
    #[serde(default)]
    coverage_assessment: String,
    #[serde(default)]
    gaps_in_resources: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

pub fn validate_path_levels(current_level: u8, target_level: u8) -> Result<(), AppError> {
    if current_level > 7 {
        return Err(AppError::Validation(
            "current_level must be between 0 and 7".to_string(),
        ));
    }
    if !(1..=7).contains(&target_level) {
        return Err(AppError::Validation(
            "target_level must be between 1 and 7".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_time_constraint(months: Option<u8>) -> Result<(), AppError> {
    match months {
        Some(m) if !(1..=24).contains(&m) => Err(AppError::Validation(
            "time_constraint_months must be between 1 and 24".to_string(),
        )),
        _ => Ok(()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Learning paths
// ────────────────────────────────────────────────────────────────────────────

/// Shared inputs for every path in one request.
#[derive(Debug, Clone, Copy)]
pub struct PathOptions<'a> {
    pub employee_name: &'a str,
    pub time_constraint_months: Option<u8>,
    pub language: &'a str,
}

/// Builds one learning path: model narrative plus catalog course items.
pub async fn generate_learning_path(
    subject: &PathSubject,
    resources: &[LearningResource],
    options: PathOptions<'_>,
    catalog: &dyn SkillCatalog,
    llm: &dyn LlmBackend,
) -> Result<LearningPath, AppError> {
    info!(
        "Generating learning path for {} - {}: {} -> {}",
        options.employee_name, subject.skill_name, subject.current_level, subject.target_level
    );

    let mut path = draft_path(subject, resources, options, llm).await?;
    path.learning_items = catalog_items(subject, catalog).await;
    info!(
        "Learning path for {} has {} catalog courses",
        subject.skill_name,
        path.learning_items.len()
    );
    Ok(path)
}

async fn draft_path(
    subject: &PathSubject,
    resources: &[LearningResource],
    options: PathOptions<'_>,
    llm: &dyn LlmBackend,
) -> Result<LearningPath, AppError> {
    if subject.current_level >= subject.target_level {
        return Ok(maintain_path(&subject.skill_name));
    }

    let prompt = build_learning_path_prompt(
        options.employee_name,
        subject,
        resources,
        options.time_constraint_months,
        options.language,
    );
    let reply: PathReply = call_json(llm, LEARNING_PATH_SYSTEM, &prompt, PATH_OPTIONS)
        .await
        .map_err(|e| AppError::Llm(format!("Generation failed: {e}")))?;

    Ok(LearningPath {
        success: true,
        path_title: reply.path_title,
        path_description: reply.path_description,
        estimated_total_hours: reply.estimated_total_hours,
        estimated_duration_weeks: reply.estimated_duration_weeks,
        learning_items: vec![],
        milestones: reply.milestones,
        ai_rationale: reply.ai_rationale,
        key_success_factors: reply.key_success_factors,
        potential_challenges: reply.potential_challenges,
    })
}

/// Catalog courses for the subject's skill. A catalog failure yields no items.
async fn catalog_items(subject: &PathSubject, catalog: &dyn SkillCatalog) -> Vec<LearningItem> {
    let Some(skill_id) = subject.skill_id.as_deref().filter(|id| !id.trim().is_empty()) else {
        return vec![];
    };
    match catalog.courses_for_skill(skill_id).await {
        Ok(courses) => {
            let fetched = courses.len();
            let items = course_items(courses, subject.current_level, subject.target_level);
            info!(
                "Fetched {fetched} courses for {skill_id}, kept {} for levels {} -> {}",
                items.len(),
                subject.current_level,
                subject.target_level
            );
            items
        }
        Err(e) => {
            warn!("Failed to fetch courses for {skill_id}: {e}");
            vec![]
        }
    }
}

fn maintain_path(skill_name: &str) -> LearningPath {
    LearningPath {
        success: true,
        path_title: format!("Maintain {skill_name} Expertise"),
        path_description: "No advancement needed - already at or above target level.".to_string(),
        estimated_total_hours: 0,
        estimated_duration_weeks: 0,
        learning_items: vec![],
        milestones: vec![],
        ai_rationale: "Employee already meets the target level.".to_string(),
        key_success_factors: vec![],
        potential_challenges: vec![],
    }
}

/// Builds a path per skill. A failed skill is reported in place and does not
/// fail the others.
pub async fn generate_learning_paths(
    skills: &[PathSubject],
    options: PathOptions<'_>,
    catalog: &dyn SkillCatalog,
    llm: &dyn LlmBackend,
) -> MultiplePathsResponse {
    info!(
        "Generating learning paths for {} skills for {}",
        skills.len(),
        options.employee_name
    );

    let mut learning_paths = Vec::with_capacity(skills.len());
    for skill in skills {
        let outcome = match validate_path_levels(skill.current_level, skill.target_level) {
            Ok(()) => generate_learning_path(skill, &[], options, catalog, llm).await,
            Err(e) => Err(e),
        };

        learning_paths.push(match outcome {
            Ok(path) => PathOutcome::Generated {
                skill_id: skill.skill_id.clone(),
                skill_name: skill.skill_name.clone(),
                skill_code: skill.skill_code.clone(),
                path,
            },
            Err(e) => {
                error!("Failed to generate learning path for {}: {e}", skill.skill_name);
                PathOutcome::Failed {
                    skill_id: skill.skill_id.clone(),
                    skill_name: skill.skill_name.clone(),
                    skill_code: skill.skill_code.clone(),
                    success: false,
                    error: e.to_string(),
                }
            }
        });
    }

    let generated = learning_paths
        .iter()
        .filter(|p| matches!(p, PathOutcome::Generated { .. }))
        .count();
    let overall_summary = if is_vietnamese(options.language) {
        format!(
            "Đã tạo lộ trình học tập cho {generated}/{} kỹ năng.",
            skills.len()
        )
    } else {
        format!(
            "Learning paths generated for {generated} of {} skills.",
            skills.len()
        )
    };

    MultiplePathsResponse {
        success: true,
        recommended_learning_order: learning_order(skills, &learning_paths),
        overall_summary,
        learning_paths,
    }
}

/// Names of skills with a path, largest level gap first. Ties keep input order.
fn learning_order(skills: &[PathSubject], outcomes: &[PathOutcome]) -> Vec<String> {
    let mut ordered: Vec<(&str, i32)> = skills
        .iter()
        .zip(outcomes)
        .filter(|(_, outcome)| matches!(outcome, PathOutcome::Generated { .. }))
        .map(|(skill, _)| {
            (
                skill.skill_name.as_str(),
                skill.target_level as i32 - skill.current_level as i32,
            )
        })
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    ordered.into_iter().map(|(name, _)| name.to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Resource ranking
// ────────────────────────────────────────────────────────────────────────────

pub async fn rank_resources(
    request: &RankResourcesRequest,
    llm: &dyn LlmBackend,
) -> Result<ResourceRanking, AppError> {
    info!(
        "Ranking {} resources for {}",
        request.resources.len(),
        request.skill_name
    );

    if request.resources.is_empty() {
        return Ok(ResourceRanking {
            success: true,
            ranked_resources: vec![],
            top_recommendations: vec![],
            coverage_assessment: "No resources available to rank.".to_string(),
            gaps_in_resources: vec![],
        });
    }

    let prompt = build_ranking_prompt(
        &request.skill_name,
        &request.skill_code,
        request.current_level,
        request.target_level,
        &request.resources,
        request.language.as_deref().unwrap_or("en"),
    );
    let reply: RankingReply = call_json(llm, RANKING_SYSTEM, &prompt, RANKING_OPTIONS)
        .await
        .map_err(|e| AppError::Llm(format!("Ranking failed: {e}")))?;

    info!("Resource ranking complete: {} ranked", reply.ranked_resources.len());
    Ok(ResourceRanking {
        success: true,
        ranked_resources: reply.ranked_resources,
        top_recommendations: reply.top_recommendations,
        coverage_assessment: reply.coverage_assessment,
        gaps_in_resources: reply.gaps_in_resources,
    })
}
