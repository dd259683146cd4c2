use std::sync::Arc;

use crate::advisor::chat::ChatResponder;
use crate::advisor::course_search::CourseSearch;
use crate::advisor::plan_generator::PlanGenerator;
use crate::advisor::AdvisorContext;
use crate::profiles::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Role table, course catalog, extractor, and resolver options.
    pub advisor: Arc<AdvisorContext>,
    /// Pluggable plan generator. Default: LlmPlanGenerator.
    pub plan_generator: Arc<dyn PlanGenerator>,
    /// DuckDuckGoSearch, or DisabledSearch when ENABLE_COURSE_SEARCH=false.
    pub course_search: Arc<dyn CourseSearch>,
    pub responder: Arc<dyn ChatResponder>,
    pub store: Arc<ProfileStore>,
}
