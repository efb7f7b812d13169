//! Skill Catalog: read-only view of skills, SFIA level definitions and employees.
//!
//! `AppState` holds an `Arc<dyn SkillCatalog>`. Production uses `PgSkillCatalog`;
//! tests use the in-memory catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgSkillCatalog;

/// A skill that has at least one level definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub skill_id: String,
    pub skill_name: String,
    pub skill_code: String,
    pub level_count: i64,
}

/// What a skill looks like at one SFIA level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub level: i32,
    pub description: String,
    pub autonomy: Option<String>,
    pub influence: Option<String>,
    pub complexity: Option<String>,
    pub business_skills: Option<String>,
    pub knowledge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub full_name: String,
    pub job_role: Option<String>,
}

/// A scraped external course mapped to a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub organization: Option<String>,
    /// Free text such as "3 months at 5 hours a week".
    pub duration: Option<String>,
    /// Free text such as "Beginner level".
    pub level: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: Option<i64>,
    pub certificate_available: Option<bool>,
}

/// Absence is `Ok(None)` / an empty list; `Err` means the store itself failed.
#[async_trait]
pub trait SkillCatalog: Send + Sync {
    /// Sorted, distinct levels in 1..=7 the skill is defined at.
    async fn levels_for_skill(&self, skill_id: &str) -> Result<Option<Vec<u8>>, AppError>;

    async fn list_skills(&self) -> Result<Vec<SkillSummary>, AppError>;

    async fn level_definitions(&self, skill_id: &str) -> Result<Vec<LevelDefinition>, AppError>;

    async fn level_definition_count(&self) -> Result<i64, AppError>;

    async fn find_employee(&self, employee_id: &str) -> Result<Option<EmployeeProfile>, AppError>;

    /// Courses for the skill, best rated first.
    async fn courses_for_skill(&self, skill_id: &str) -> Result<Vec<CourseRecord>, AppError>;
}

/// Keeps levels inside 1..=7, sorted and without duplicates. `None` if nothing is left.
pub fn normalize_levels(levels: impl IntoIterator<Item = i32>) -> Option<Vec<u8>> {
    let mut levels: Vec<u8> = levels
        .into_iter()
        .filter_map(|l| u8::try_from(l).ok())
        .filter(|l| (1..=7).contains(l))
        .collect();
    levels.sort_unstable();
    levels.dedup();
    (!levels.is_empty()).then_some(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_levels_sorts_and_dedups() {
        assert_eq!(normalize_levels([5, 3, 3, 4]), Some(vec![3, 4, 5]));
    }

    #[test]
    fn test_normalize_levels_drops_out_of_range() {
        assert_eq!(normalize_levels([0, 2, 8, -1]), Some(vec![2]));
        assert_eq!(normalize_levels([0, 9]), None);
        assert_eq!(normalize_levels(Vec::<i32>::new()), None);
    }
}
