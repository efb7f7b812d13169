// Prompt text for learning paths and resource ranking.

use serde::Serialize;

use crate::gaps::sfia_level_name;
use crate::learning::{LearningResource, PathSubject};
use crate::llm_client::prompts::{language_name, JSON_ONLY_INSTRUCTION};

pub const LEARNING_PATH_SYSTEM: &str = "You are an expert learning and development consultant. \
    Design effective, practical learning paths. Always return valid JSON.";

pub const RANKING_SYSTEM: &str = "You are an expert learning consultant. \
    Evaluate and rank learning resources objectively. Always return valid JSON.";

/// Resources listed in a learning-path prompt.
const PATH_RESOURCE_LIMIT: usize = 15;
/// Resources sent for ranking.
pub const RANKING_RESOURCE_LIMIT: usize = 20;
const DESCRIPTION_PREVIEW_CHARS: usize = 200;

fn preview(text: &str) -> String {
    text.chars().take(DESCRIPTION_PREVIEW_CHARS).collect()
}

fn resources_section(resources: &[LearningResource]) -> String {
    if resources.is_empty() {
        return String::new();
    }

    let mut section = String::from(
        "AVAILABLE LEARNING RESOURCES (use these REAL resources in the path when relevant):\n",
    );
    for (i, resource) in resources.iter().take(PATH_RESOURCE_LIMIT).enumerate() {
        let hours = resource
            .estimated_hours
            .map(|h| h.to_string())
            .unwrap_or_else(|| "?".to_string());
        let level = resource
            .difficulty
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!(" | Level: {d}"))
            .unwrap_or_default();
        section.push_str(&format!(
            "{}. {} [{}] ({hours} hours{level})\n   ID: {}\n",
            i + 1,
            resource.title,
            resource.resource_type,
            resource.id
        ));
        if let Some(description) = resource.description.as_deref().filter(|d| !d.is_empty()) {
            section.push_str(&format!("   Description: {}\n", preview(description)));
        }
    }
    section
}

pub fn build_learning_path_prompt(
    employee_name: &str,
    subject: &PathSubject,
    resources: &[LearningResource],
    time_constraint_months: Option<u8>,
    language: &str,
) -> String {
    let lang = language_name(language);
    let description = subject
        .skill_description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| format!("SKILL DESCRIPTION: {d}\n"))
        .unwrap_or_default();
    let time = time_constraint_months
        .map(|m| format!("TIME CONSTRAINT: Complete within {m} months\n"))
        .unwrap_or_default();

    format!(
        "You are an expert learning and development consultant specializing in IT/Tech skill development.\n\n\
         CONTEXT:\n\
         - Employee: {employee_name}\n\
         - Skill to Develop: {skill} ({code})\n\
         - Current Level: {current} ({current_name})\n\
         - Target Level: {target} ({target_name})\n\
         - Levels to Advance: {advance}\n\
         {description}\n\
         {resources}\n\
         {time}\n\
         TASK:\n\
         Create a learning path that takes the employee from level {current} to level {target}. \
         Build skills progressively without skipping levels, mix learning methods, include \
         practical application and define milestones to measure progress.\n\n\
         Return JSON matching this exact schema:\n\
         {{\n\
           \"path_title\": \"Title for this learning path in {lang}\",\n\
           \"path_description\": \"Brief description of the learning journey in {lang}\",\n\
           \"estimated_total_hours\": <number>,\n\
           \"estimated_duration_weeks\": <number>,\n\
           \"milestones\": [\n\
             {{\n\
               \"after_item\": <order number>,\n\
               \"description\": \"Milestone description in {lang}\",\n\
               \"expected_level\": <number 1-7>\n\
             }}\n\
           ],\n\
           \"ai_rationale\": \"Why the path is designed this way in {lang}\",\n\
           \"key_success_factors\": [\"Factor 1\", \"Factor 2\"],\n\
           \"potential_challenges\": [\"Challenge 1\", \"Challenge 2\"]\n\
         }}\n\n\
         RULES:\n\
         - Each level advancement typically needs 20-40 hours of learning\n\
         - Include at least one hands-on project among the milestones\n\
         - Prefer the real resources listed above over generic suggestions\n\
         - All text in {lang}\n\
         {JSON_ONLY_INSTRUCTION}",
        skill = subject.skill_name,
        code = subject.skill_code,
        current = subject.current_level,
        current_name = sfia_level_name(subject.current_level),
        target = subject.target_level,
        target_name = sfia_level_name(subject.target_level),
        advance = subject.target_level as i32 - subject.current_level as i32,
        resources = resources_section(resources),
    )
}

#[derive(Serialize)]
struct ResourceSummary<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(rename = "type")]
    resource_type: &'a str,
    description: String,
    estimated_hours: Option<u32>,
    difficulty: &'a str,
    from_level: Option<u8>,
    to_level: Option<u8>,
}

pub fn build_ranking_prompt(
    skill_name: &str,
    skill_code: &str,
    current_level: u8,
    target_level: u8,
    resources: &[LearningResource],
    language: &str,
) -> String {
    let lang = language_name(language);
    let summaries: Vec<ResourceSummary<'_>> = resources
        .iter()
        .take(RANKING_RESOURCE_LIMIT)
        .map(|r| ResourceSummary {
            id: &r.id,
            title: &r.title,
            resource_type: &r.resource_type,
            description: r.description.as_deref().map(preview).unwrap_or_default(),
            estimated_hours: r.estimated_hours,
            difficulty: r.difficulty.as_deref().unwrap_or(""),
            from_level: r.from_level,
            to_level: r.to_level,
        })
        .collect();
    // Serializing plain strings and numbers cannot fail.
    let resources_json = serde_json::to_string_pretty(&summaries).unwrap_or_default();

    format!(
        "You are an expert learning consultant. Rank these learning resources by relevance.\n\n\
         SKILL DEVELOPMENT CONTEXT:\n\
         - Skill: {skill_name} ({skill_code})\n\
         - Current Level: {current_level}\n\
         - Target Level: {target_level}\n\
         - Gap: {gap} levels\n\n\
         AVAILABLE RESOURCES:\n\
         {resources_json}\n\n\
         TASK:\n\
         Rank the resources by how well they help close the skill gap. Consider relevance to \
         the skill, fit for the level transition, hours against value and a sensible learning \
         sequence.\n\n\
         Return JSON matching this exact schema:\n\
         {{\n\
           \"ranked_resources\": [\n\
             {{\n\
               \"resource_id\": \"<id>\",\n\
               \"rank\": 1,\n\
               \"relevance_score\": <0-100>,\n\
               \"reason\": \"Why this resource is ranked here in {lang}\"\n\
             }}\n\
           ],\n\
           \"top_recommendations\": [\"id1\", \"id2\", \"id3\"],\n\
           \"coverage_assessment\": \"How well these resources cover the skill gap in {lang}\",\n\
           \"gaps_in_resources\": [\"What is missing in {lang}\"]\n\
         }}\n\n\
         {JSON_ONLY_INSTRUCTION}",
        gap = target_level as i32 - current_level as i32,
    )
}
