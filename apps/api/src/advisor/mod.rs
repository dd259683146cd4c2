// Learning advisor: requirement extraction, gap resolution, and plan generation.
// All LLM calls go through llm_client; web lookups go through course_search.

pub mod chat;
pub mod course_search;
pub mod extractor;
pub mod gap_analysis;
pub mod gap_resolver;
pub mod handlers;
pub mod plan_generator;
pub mod prompts;

#[cfg(test)]
pub mod testing;

use crate::catalog::{CourseCatalog, RoleTable, SkillVocabulary};
use extractor::RequirementExtractor;
use gap_resolver::ResolverOptions;

/// Read-only reference data shared by every advisor operation.
#[derive(Debug, Clone)]
pub struct AdvisorContext {
    pub roles: RoleTable,
    pub catalog: CourseCatalog,
    pub extractor: RequirementExtractor,
    pub options: ResolverOptions,
}

impl AdvisorContext {
    /// The extractor's vocabulary is derived from the two tables.
    pub fn new(roles: RoleTable, catalog: CourseCatalog, options: ResolverOptions) -> Self {
        let extractor = RequirementExtractor::new(SkillVocabulary::from_tables(&roles, &catalog));
        Self {
            roles,
            catalog,
            extractor,
            options,
        }
    }

    pub fn builtin(options: ResolverOptions) -> Self {
        Self::new(RoleTable::builtin(), CourseCatalog::builtin(), options)
    }
}
