//! Skill Gap Analyzer: AI commentary on the distance between an employee's
//! current SFIA level and the level their role requires.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::catalog::SkillCatalog;
use crate::errors::AppError;
use crate::gaps::prompts::{build_gap_analysis_prompt, GAP_ANALYSIS_SYSTEM};
use crate::llm_client::prompts::is_vietnamese;
use crate::llm_client::{call_json, CompletionOptions, LlmBackend};

const GAP_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.4,
    max_tokens: 1024,
};

/// A gap of this many levels or more is reported as critical.
const CRITICAL_GAP_SIZE: i32 = 3;
const PRIORITY_ORDER_LIMIT: usize = 5;
const FOCUS_AREA_LIMIT: usize = 3;

pub fn sfia_level_name(level: u8) -> &'static str {
    match level {
        0 => "None",
        1 => "Follow",
        2 => "Assist",
        3 => "Apply",
        4 => "Enable",
        5 => "Ensure/Advise",
        6 => "Initiate",
        7 => "Set Strategy",
        _ => "Unknown",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct SkillGapRequest {
    pub employee_id: String,
    #[serde(default)]
    pub job_role: Option<String>,
    #[serde(default)]
    pub skill_id: Option<String>,
    pub skill_name: String,
    pub skill_code: String,
    pub current_level: u8,
    pub required_level: u8,
    #[serde(default)]
    pub skill_description: Option<String>,
    #[serde(default)]
    pub current_level_description: Option<String>,
    #[serde(default)]
    pub required_level_description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// One entry of a batch gap request. Loosely typed: missing fields get defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct GapInput {
    #[serde(default)]
    pub skill_id: Option<String>,
    #[serde(default = "unknown_skill")]
    pub skill_name: String,
    #[serde(default)]
    pub skill_code: String,
    #[serde(default)]
    pub current_level: u8,
    #[serde(default = "default_required_level")]
    pub required_level: u8,
    #[serde(default)]
    pub skill_description: Option<String>,
}

fn unknown_skill() -> String {
    "Unknown".to_string()
}

fn default_required_level() -> u8 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultipleGapsRequest {
    pub employee_id: String,
    #[serde(default)]
    pub job_role: Option<String>,
    pub gaps: Vec<GapInput>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub success: bool,
    pub ai_analysis: String,
    pub ai_recommendation: String,
    pub priority_rationale: String,
    pub estimated_effort: String,
    pub key_actions: Vec<String>,
    pub potential_blockers: Vec<String>,
}

/// Result for one gap in a batch. A failed gap does not fail the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GapOutcome {
    Analyzed {
        skill_id: Option<String>,
        skill_name: String,
        gap_size: i32,
        #[serde(flatten)]
        analysis: GapAnalysis,
    },
    Failed {
        skill_id: Option<String>,
        skill_name: String,
        success: bool,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipleGapsResponse {
    pub success: bool,
    pub gap_analyses: Vec<GapOutcome>,
    pub overall_summary: String,
    pub priority_order: Vec<String>,
    pub recommended_focus_areas: Vec<String>,
}

/// Who the analysis is for.
#[derive(Debug, Clone, PartialEq)]
pub struct GapContext {
    pub employee_name: String,
    pub job_role: String,
}

/// The skill and the two levels being compared.
#[derive(Debug, Clone, PartialEq)]
pub struct GapSubject {
    pub skill_name: String,
    pub skill_code: String,
    pub current_level: u8,
    pub required_level: u8,
    pub skill_description: Option<String>,
    pub current_level_description: Option<String>,
    pub required_level_description: Option<String>,
}

impl GapSubject {
    pub fn gap_size(&self) -> i32 {
        self.required_level as i32 - self.current_level as i32
    }
}

impl From<&SkillGapRequest> for GapSubject {
    fn from(request: &SkillGapRequest) -> Self {
        Self {
            skill_name: request.skill_name.clone(),
            skill_code: request.skill_code.clone(),
            current_level: request.current_level,
            required_level: request.required_level,
            skill_description: request.skill_description.clone(),
            current_level_description: request.current_level_description.clone(),
            required_level_description: request.required_level_description.clone(),
        }
    }
}

impl From<&GapInput> for GapSubject {
    fn from(input: &GapInput) -> Self {
        Self {
            skill_name: input.skill_name.clone(),
            skill_code: input.skill_code.clone(),
            current_level: input.current_level,
            required_level: input.required_level,
            skill_description: input.skill_description.clone(),
            current_level_description: None,
            required_level_description: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GapReply {
    #[serde(default)]
    ai_analysis: String,
    #[serde(default)]
    ai_recommendation: String,
    #[serde(default)]
    priority_rationale: String,
    #[serde(default)]
    estimated_effort: String,
    #[serde(default)]
    key_actions: Vec<String>,
    #[serde(default)]
    potential_blockers: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis
// ────────────────────────────────────────────────────────────────────────────

/// Resolves the employee's display name and role. Role precedence:
/// request → employee record → "Unknown".
pub async fn resolve_context(
    catalog: &dyn SkillCatalog,
    employee_id: &str,
    job_role: Option<&str>,
) -> Result<GapContext, AppError> {
    let employee = catalog
        .find_employee(employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee not found: {employee_id}")))?;

    let job_role = job_role
        .filter(|r| !r.trim().is_empty())
        .map(str::to_string)
        .or(employee.job_role)
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(GapContext {
        employee_name: employee.full_name,
        job_role,
    })
}

pub fn validate_levels(current_level: u8, required_level: u8) -> Result<(), AppError> {
    if current_level > 7 {
        return Err(AppError::Validation(
            "current_level must be between 0 and 7".to_string(),
        ));
    }
    if !(1..=7).contains(&required_level) {
        return Err(AppError::Validation(
            "required_level must be between 1 and 7".to_string(),
        ));
    }
    Ok(())
}

pub async fn analyze_gap(
    context: &GapContext,
    subject: &GapSubject,
    language: &str,
    llm: &dyn LlmBackend,
) -> Result<GapAnalysis, AppError> {
    info!(
        "Analyzing gap for {}: {} -> {}",
        subject.skill_name, subject.current_level, subject.required_level
    );

    if subject.current_level >= subject.required_level {
        return Ok(no_gap(language));
    }

    let prompt = build_gap_analysis_prompt(context, subject, language);
    let reply: GapReply = call_json(llm, GAP_ANALYSIS_SYSTEM, &prompt, GAP_OPTIONS)
        .await
        .map_err(|e| AppError::Llm(format!("Gap analysis failed: {e}")))?;

    Ok(GapAnalysis {
        success: true,
        ai_analysis: reply.ai_analysis,
        ai_recommendation: reply.ai_recommendation,
        priority_rationale: reply.priority_rationale,
        estimated_effort: reply.estimated_effort,
        key_actions: reply.key_actions,
        potential_blockers: reply.potential_blockers,
    })
}

/// Analyzes each gap independently and ranks the successful ones by gap size.
pub async fn analyze_gaps(
    context: &GapContext,
    gaps: &[GapInput],
    language: &str,
    llm: &dyn LlmBackend,
) -> MultipleGapsResponse {
    info!("Analyzing {} gaps for {}", gaps.len(), context.employee_name);

    let vi = is_vietnamese(language);
    if gaps.is_empty() {
        let summary = if vi {
            "Không xác định được khoảng cách kỹ năng nào."
        } else {
            "No skill gaps identified."
        };
        return MultipleGapsResponse {
            success: true,
            gap_analyses: vec![],
            overall_summary: summary.to_string(),
            priority_order: vec![],
            recommended_focus_areas: vec![],
        };
    }

    let mut gap_analyses = Vec::with_capacity(gaps.len());
    for gap in gaps {
        let subject = GapSubject::from(gap);
        let outcome = match validate_levels(gap.current_level, gap.required_level) {
            Ok(()) => analyze_gap(context, &subject, language, llm).await,
            Err(e) => Err(e),
        };

        gap_analyses.push(match outcome {
            Ok(analysis) => GapOutcome::Analyzed {
                skill_id: gap.skill_id.clone(),
                skill_name: gap.skill_name.clone(),
                gap_size: subject.gap_size(),
                analysis,
            },
            Err(e) => {
                error!("Failed to analyze gap for {}: {e}", gap.skill_name);
                GapOutcome::Failed {
                    skill_id: gap.skill_id.clone(),
                    skill_name: gap.skill_name.clone(),
                    success: false,
                    error: e.to_string(),
                }
            }
        });
    }

    let critical = gaps
        .iter()
        .filter(|g| GapSubject::from(*g).gap_size() >= CRITICAL_GAP_SIZE)
        .count();
    let overall_summary = if vi {
        format!(
            "Phân tích hoàn tất cho {} khoảng cách kỹ năng. {critical} khoảng cách nghiêm trọng cần được chú ý ngay.",
            gaps.len()
        )
    } else {
        format!(
            "Analysis complete for {} skill gaps. {critical} critical gaps identified requiring immediate attention.",
            gaps.len()
        )
    };

    let ranked = rank_by_gap_size(&gap_analyses);
    MultipleGapsResponse {
        success: true,
        overall_summary,
        priority_order: ranked.iter().take(PRIORITY_ORDER_LIMIT).cloned().collect(),
        recommended_focus_areas: ranked.iter().take(FOCUS_AREA_LIMIT).cloned().collect(),
        gap_analyses,
    }
}

/// Names of successfully analyzed skills, largest gap first. Ties keep input order.
fn rank_by_gap_size(outcomes: &[GapOutcome]) -> Vec<String> {
    let mut analyzed: Vec<(&str, i32)> = outcomes
        .iter()
        .filter_map(|o| match o {
            GapOutcome::Analyzed {
                skill_name,
                gap_size,
                ..
            } => Some((skill_name.as_str(), *gap_size)),
            GapOutcome::Failed { .. } => None,
        })
        .collect();
    analyzed.sort_by(|a, b| b.1.cmp(&a.1));
    analyzed.into_iter().map(|(name, _)| name.to_string()).collect()
}

fn no_gap(language: &str) -> GapAnalysis {
    let (analysis, recommendation) = if is_vietnamese(language) {
        (
            "Không có khoảng cách - nhân viên đạt hoặc vượt mức yêu cầu.",
            "Tiếp tục duy trì và chia sẻ kiến thức với các thành viên trong nhóm.",
        )
    } else {
        (
            "No gap exists - employee meets or exceeds the required level.",
            "Continue to maintain and share expertise with team members.",
        )
    };

    GapAnalysis {
        success: true,
        ai_analysis: analysis.to_string(),
        ai_recommendation: recommendation.to_string(),
        priority_rationale: "No action needed".to_string(),
        estimated_effort: "N/A".to_string(),
        key_actions: vec![],
        potential_blockers: vec![],
    }
}
