// Prompt text for assessment question generation.

use crate::catalog::LevelDefinition;
use crate::generation::{GenerationPlan, QuestionType};
use crate::llm_client::prompts::{language_name, JSON_ONLY_INSTRUCTION};

pub const GENERATION_SYSTEM: &str = "You are an expert assessment question generator. \
    You always return valid JSON without markdown formatting.";

/// Skill focus for the prompt: the catalog levels the questions should target.
pub struct SkillFocus<'a> {
    pub skill_id: &'a str,
    pub skill_name: &'a str,
    pub levels: &'a [LevelDefinition],
}

fn type_instruction(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::MultipleChoice => "Single correct answer, 2-4 options",
        QuestionType::MultipleAnswer => "Multiple correct answers possible, 2-4 options",
        QuestionType::TrueFalse => "Exactly 2 options: True and False",
        QuestionType::ShortAnswer => "Provide grading_rubric with keywords",
        QuestionType::LongAnswer => "Provide grading_rubric with criteria",
        QuestionType::CodingChallenge => "Include code_snippet and grading_rubric with test_cases",
        QuestionType::Scenario => "Complex scenario with grading_rubric",
        QuestionType::SituationalJudgment => {
            "4 options with effectiveness_level (MostEffective/Effective/Ineffective/CounterProductive)"
        }
        QuestionType::Rating => "5 rating scale options, all marked as correct",
    }
}

fn skill_section(skill: Option<&SkillFocus<'_>>) -> String {
    let Some(skill) = skill else {
        return "SKILL: General technical skill assessment\n".to_string();
    };

    let mut section = format!(
        "SKILL: {}\nSKILL_ID: {}\n\nPROFICIENCY LEVELS:\n",
        skill.skill_name, skill.skill_id
    );
    for level in skill.levels {
        section.push_str(&format!(
            "\nLevel {}:\n- Description: {}\n- Autonomy: {}\n- Influence: {}\n- Complexity: {}\n",
            level.level,
            level.description,
            level.autonomy.as_deref().unwrap_or(""),
            level.influence.as_deref().unwrap_or(""),
            level.complexity.as_deref().unwrap_or(""),
        ));
    }
    section
}

pub fn build_generation_prompt(plan: &GenerationPlan, skill: Option<&SkillFocus<'_>>) -> String {
    let lang = language_name(&plan.language);
    let skill_id = skill.map(|s| s.skill_id).unwrap_or("null");

    let mut types = String::from("QUESTION TYPES TO GENERATE:\n");
    for question_type in &plan.question_types {
        types.push_str(&format!(
            "- {}\n  * {}\n",
            question_type.as_str(),
            type_instruction(*question_type)
        ));
    }

    let context = plan
        .additional_context
        .as_deref()
        .map(|c| format!("ADDITIONAL CONTEXT:\n{c}\n"))
        .unwrap_or_default();

    let focus_levels = if plan.target_levels.is_empty() {
        String::new()
    } else {
        let levels: Vec<String> = plan.target_levels.iter().map(u8::to_string).collect();
        format!("TARGET PROFICIENCY LEVELS: {}\n", levels.join(", "))
    };

    format!(
        "You are an expert assessment question generator.\n\n\
         {skill_section}\n\
         {context}\n\
         TASK:\n\
         Generate exactly {count} high-quality assessment questions in {lang}.\n\n\
         {types}\n\
         DIFFICULTY LEVEL: {difficulty}\n\
         {focus_levels}\n\
         Return JSON matching this exact schema:\n\
         {{\n\
           \"questions\": [\n\
             {{\n\
               \"skill_id\": \"{skill_id}\",\n\
               \"type\": \"MultipleChoice|MultipleAnswer|TrueFalse|ShortAnswer|LongAnswer|CodingChallenge|Scenario|SituationalJudgment|Rating\",\n\
               \"content\": \"Clear, professional question text in {lang}\",\n\
               \"code_snippet\": \"Optional code for context\",\n\
               \"media_url\": null,\n\
               \"target_level\": 1-7,\n\
               \"difficulty\": \"Easy|Medium|Hard\",\n\
               \"points\": 5-30,\n\
               \"time_limit_seconds\": 60-900,\n\
               \"tags\": [\"relevant\", \"tags\"],\n\
               \"options\": [\n\
                 {{\n\
                   \"content\": \"Option text\",\n\
                   \"is_correct\": true,\n\
                   \"display_order\": 1,\n\
                   \"explanation\": \"Why correct/incorrect\",\n\
                   \"effectiveness_level\": \"MostEffective|Effective|Ineffective|CounterProductive (SituationalJudgment only)\"\n\
                 }}\n\
               ],\n\
               \"grading_rubric\": \"JSON string for text and coding questions, otherwise null\",\n\
               \"explanation\": \"Answer explanation\",\n\
               \"hints\": [\"helpful hint\"]\n\
             }}\n\
           ]\n\
         }}\n\n\
         RULES:\n\
         1. Use the exact skill_id above for ALL questions\n\
         2. MultipleChoice: exactly 1 option with is_correct=true\n\
         3. MultipleAnswer: 2+ options with is_correct=true\n\
         4. TrueFalse: exactly 2 options (True/False)\n\
         5. ShortAnswer/LongAnswer: include grading_rubric as a JSON string\n\
         6. CodingChallenge: include code_snippet and grading_rubric with test_cases\n\
         7. SituationalJudgment: 4 options with effectiveness_level\n\
         8. Rating: 3-5 options, all with is_correct=true\n\
         9. Questions must be practical, unambiguous and spread across the proficiency levels\n\
         {JSON_ONLY_INSTRUCTION}",
        skill_section = skill_section(skill),
        count = plan.number_of_questions,
        difficulty = plan.difficulty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> GenerationPlan {
        GenerationPlan {
            question_types: vec![QuestionType::MultipleChoice, QuestionType::SituationalJudgment],
            language: "vi".to_string(),
            number_of_questions: 4,
            difficulty: "hard".to_string(),
            target_levels: vec![3, 4],
            additional_context: Some("Focus on WCAG".to_string()),
            skill: None,
        }
    }

    #[test]
    fn test_prompt_lists_types_with_instructions() {
        let prompt = build_generation_prompt(&plan(), None);
        assert!(prompt.contains("- MultipleChoice\n  * Single correct answer, 2-4 options"));
        assert!(prompt.contains("- SituationalJudgment\n  * 4 options with effectiveness_level"));
        assert!(prompt.contains("Generate exactly 4 high-quality assessment questions in Vietnamese."));
        assert!(prompt.contains("DIFFICULTY LEVEL: hard"));
        assert!(prompt.contains("TARGET PROFICIENCY LEVELS: 3, 4"));
        assert!(prompt.contains("ADDITIONAL CONTEXT:\nFocus on WCAG"));
        assert!(prompt.contains("SKILL: General technical skill assessment"));
        assert!(prompt.contains("\"skill_id\": \"null\""));
    }

    #[test]
    fn test_prompt_includes_catalog_levels() {
        let levels = vec![LevelDefinition {
            level: 3,
            description: "Applies accessibility standards".to_string(),
            autonomy: Some("Works under general direction".to_string()),
            influence: None,
            complexity: None,
            business_skills: None,
            knowledge: None,
        }];
        let skill = SkillFocus {
            skill_id: "30000000-0000-0000-0000-000000000078",
            skill_name: "Accessibility and inclusion",
            levels: &levels,
        };

        let prompt = build_generation_prompt(&plan(), Some(&skill));
        assert!(prompt.contains("SKILL_ID: 30000000-0000-0000-0000-000000000078"));
        assert!(prompt.contains("Level 3:\n- Description: Applies accessibility standards"));
        assert!(prompt.contains("- Autonomy: Works under general direction"));
        assert!(prompt.contains("\"skill_id\": \"30000000-0000-0000-0000-000000000078\""));
    }
}
