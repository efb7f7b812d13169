use std::sync::Arc;

use crate::catalog::SkillCatalog;
use crate::llm_client::LlmBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Skills, level definitions and employees. Default: `PgSkillCatalog`.
    pub catalog: Arc<dyn SkillCatalog>,
    /// Chat-completions backend used for grading and gap analysis.
    pub llm: Arc<dyn LlmBackend>,
}
