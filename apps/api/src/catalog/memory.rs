use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::catalog::{
    normalize_levels, CourseRecord, EmployeeProfile, LevelDefinition, SkillCatalog, SkillSummary,
};
use crate::errors::AppError;

/// In-memory catalog for handler and coordinator tests.
#[derive(Default, Clone)]
pub struct InMemorySkillCatalog {
    skills: Vec<SkillSummary>,
    definitions: HashMap<String, Vec<LevelDefinition>>,
    employees: HashMap<String, EmployeeProfile>,
    courses: HashMap<String, Vec<CourseRecord>>,
    failing: HashSet<String>,
    unavailable: bool,
}

impl InMemorySkillCatalog {
    pub fn with_levels(mut self, skill_id: &str, levels: &[u8]) -> Self {
        let definitions = levels
            .iter()
            .map(|&level| LevelDefinition {
                level: level as i32,
                description: format!("Level {level} description"),
                autonomy: None,
                influence: None,
                complexity: None,
                business_skills: None,
                knowledge: None,
            })
            .collect::<Vec<_>>();

        if !definitions.is_empty() {
            self.skills.push(SkillSummary {
                skill_id: skill_id.to_string(),
                skill_name: format!("Skill {skill_id}"),
                skill_code: skill_id.to_uppercase(),
                level_count: definitions.len() as i64,
            });
        }
        self.definitions.insert(skill_id.to_string(), definitions);
        self
    }

    pub fn with_employee(mut self, employee_id: &str, name: &str, role: Option<&str>) -> Self {
        self.employees.insert(
            employee_id.to_string(),
            EmployeeProfile {
                full_name: name.to_string(),
                job_role: role.map(str::to_string),
            },
        );
        self
    }

    pub fn with_courses(mut self, skill_id: &str, courses: Vec<CourseRecord>) -> Self {
        self.courses.insert(skill_id.to_string(), courses);
        self
    }

    /// Level lookups for this skill fail as if the database were down.
    pub fn failing_for(mut self, skill_id: &str) -> Self {
        self.failing.insert(skill_id.to_string());
        self
    }

    /// Every call fails.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check(&self, key: Option<&str>) -> Result<(), AppError> {
        if self.unavailable || key.is_some_and(|k| self.failing.contains(k)) {
            return Err(AppError::Internal(anyhow::anyhow!("catalog unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl SkillCatalog for InMemorySkillCatalog {
    async fn levels_for_skill(&self, skill_id: &str) -> Result<Option<Vec<u8>>, AppError> {
        self.check(Some(skill_id))?;
        Ok(self
            .definitions
            .get(skill_id)
            .and_then(|defs| normalize_levels(defs.iter().map(|d| d.level))))
    }

    async fn list_skills(&self) -> Result<Vec<SkillSummary>, AppError> {
        self.check(None)?;
        Ok(self.skills.clone())
    }

    async fn level_definitions(&self, skill_id: &str) -> Result<Vec<LevelDefinition>, AppError> {
        self.check(Some(skill_id))?;
        Ok(self.definitions.get(skill_id).cloned().unwrap_or_default())
    }

    async fn level_definition_count(&self) -> Result<i64, AppError> {
        self.check(None)?;
        Ok(self.definitions.values().map(|d| d.len() as i64).sum())
    }

    async fn find_employee(&self, employee_id: &str) -> Result<Option<EmployeeProfile>, AppError> {
        self.check(None)?;
        Ok(self.employees.get(employee_id).cloned())
    }

    async fn courses_for_skill(&self, skill_id: &str) -> Result<Vec<CourseRecord>, AppError> {
        self.check(Some(skill_id))?;
        Ok(self.courses.get(skill_id).cloned().unwrap_or_default())
    }
}
