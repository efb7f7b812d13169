use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{
    normalize_levels, CourseRecord, EmployeeProfile, LevelDefinition, SkillCatalog, SkillSummary,
};
use crate::errors::AppError;

/// Catalog backed by the SkillMatrix PostgreSQL schema.
///
/// Rows flagged `"IsDeleted"` and inactive skills are never returned.
#[derive(Clone)]
pub struct PgSkillCatalog {
    pool: PgPool,
}

impl PgSkillCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SkillRow {
    id: Uuid,
    name: String,
    code: String,
    level_count: i64,
}

#[derive(FromRow)]
struct LevelDefinitionRow {
    level: i32,
    description: String,
    autonomy: Option<String>,
    influence: Option<String>,
    complexity: Option<String>,
    business_skills: Option<String>,
    knowledge: Option<String>,
}

#[derive(FromRow)]
struct CourseRow {
    id: i64,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    organization: Option<String>,
    duration: Option<String>,
    level: Option<String>,
    rating: Option<f64>,
    reviews_count: Option<i64>,
    certificate_available: Option<bool>,
}

#[derive(FromRow)]
struct EmployeeRow {
    full_name: String,
    job_role: Option<String>,
}

/// Skill ids are UUIDs in the store; anything else cannot match a row.
fn parse_id(raw: &str) -> Option<Uuid> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            debug!("Ignoring non-UUID catalog id: {raw}");
            None
        }
    }
}

#[async_trait]
impl SkillCatalog for PgSkillCatalog {
    async fn levels_for_skill(&self, skill_id: &str) -> Result<Option<Vec<u8>>, AppError> {
        let Some(id) = parse_id(skill_id) else {
            return Ok(None);
        };

        let levels: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT sld."Level"
            FROM public."SkillLevelDefinitions" sld
            JOIN public."Skills" s ON sld."SkillId" = s."Id"
            WHERE NOT sld."IsDeleted"
              AND NOT s."IsDeleted"
              AND s."IsActive" = true
              AND sld."SkillId" = $1
            ORDER BY sld."Level"
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        debug!("Retrieved {} levels for skill ID: {skill_id}", levels.len());
        Ok(normalize_levels(levels))
    }

    async fn list_skills(&self) -> Result<Vec<SkillSummary>, AppError> {
        let rows = sqlx::query_as::<_, SkillRow>(
            r#"
            SELECT s."Id" AS id, s."Name" AS name, s."Code" AS code,
                   COUNT(sld."Id") AS level_count
            FROM public."Skills" s
            JOIN public."SkillLevelDefinitions" sld ON s."Id" = sld."SkillId"
            WHERE NOT s."IsDeleted"
              AND NOT sld."IsDeleted"
              AND s."IsActive" = true
            GROUP BY s."Id", s."Name", s."Code"
            ORDER BY s."Name"
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SkillSummary {
                skill_id: row.id.to_string(),
                skill_name: row.name,
                skill_code: row.code,
                level_count: row.level_count,
            })
            .collect())
    }

    async fn level_definitions(&self, skill_id: &str) -> Result<Vec<LevelDefinition>, AppError> {
        let Some(id) = parse_id(skill_id) else {
            return Ok(vec![]);
        };

        let rows = sqlx::query_as::<_, LevelDefinitionRow>(
            r#"
            SELECT sld."Level" AS level,
                   sld."Description" AS description,
                   sld."Autonomy" AS autonomy,
                   sld."Influence" AS influence,
                   sld."Complexity" AS complexity,
                   sld."BusinessSkills" AS business_skills,
                   sld."Knowledge" AS knowledge
            FROM public."SkillLevelDefinitions" sld
            JOIN public."Skills" s ON sld."SkillId" = s."Id"
            WHERE NOT sld."IsDeleted"
              AND NOT s."IsDeleted"
              AND s."IsActive" = true
              AND sld."SkillId" = $1
            ORDER BY sld."Level"
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LevelDefinition {
                level: row.level,
                description: row.description,
                autonomy: row.autonomy,
                influence: row.influence,
                complexity: row.complexity,
                business_skills: row.business_skills,
                knowledge: row.knowledge,
            })
            .collect())
    }

    async fn level_definition_count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM public."SkillLevelDefinitions" WHERE NOT "IsDeleted""#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn find_employee(&self, employee_id: &str) -> Result<Option<EmployeeProfile>, AppError> {
        let Some(id) = parse_id(employee_id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT e."FullName" AS full_name, jr."Name" AS job_role
            FROM public."Employees" e
            LEFT JOIN public."JobRoles" jr ON e."JobRoleId" = jr."Id"
            WHERE e."Id" = $1 AND NOT e."IsDeleted"
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| EmployeeProfile {
            full_name: row.full_name,
            job_role: row.job_role,
        }))
    }

    async fn courses_for_skill(&self, skill_id: &str) -> Result<Vec<CourseRecord>, AppError> {
        let Some(id) = parse_id(skill_id) else {
            return Ok(vec![]);
        };

        let rows = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT c."Id"::bigint AS id,
                   c."Title" AS title,
                   c."Description" AS description,
                   c."Url" AS url,
                   c."Organization" AS organization,
                   c."Duration" AS duration,
                   c."Level" AS level,
                   c."Rating"::float8 AS rating,
                   c."ReviewsCount"::bigint AS reviews_count,
                   c."CertificateAvailable" AS certificate_available
            FROM public."CourseraCourse" c
            WHERE c."SkillId" = $1
            ORDER BY c."Rating" DESC NULLS LAST, c."ReviewsCount" DESC NULLS LAST
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        debug!("Retrieved {} courses for skill ID: {skill_id}", rows.len());
        Ok(rows
            .into_iter()
            .map(|row| CourseRecord {
                id: row.id,
                title: row.title,
                description: row.description,
                url: row.url,
                organization: row.organization,
                duration: row.duration,
                level: row.level,
                rating: row.rating,
                reviews_count: row.reviews_count,
                certificate_available: row.certificate_available,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id(&format!("  {id} ")), Some(id));
    }

    #[test]
    fn test_parse_id_rejects_other_strings() {
        assert_eq!(parse_id("skill-1"), None);
        assert_eq!(parse_id(""), None);
    }
}
