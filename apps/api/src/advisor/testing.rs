// Test doubles for the advisor's pluggable backends.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::advisor::chat::ChatResponder;
use crate::advisor::course_search::{CourseSearch, SearchError, SearchHit};
use crate::advisor::plan_generator::{PlanError, PlanGenerator, PlanParseError, PlanRequest};
use crate::llm_client::LlmError;
use crate::models::plan::GeneratedPlan;
use crate::models::profile::Profile;
use crate::profiles::store::seed_profiles;

/// Alex Johnson, the first seeded employee.
pub fn sample_profile() -> Profile {
    seed_profiles()
        .into_iter()
        .next()
        .expect("seed data is not empty")
}

/// Returns canned hits and records every query it receives.
pub struct StubSearch {
    web: Vec<SearchHit>,
    courses: Vec<SearchHit>,
    fail: bool,
    queries: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn new(web: Vec<SearchHit>, courses: Vec<SearchHit>, fail: bool) -> Self {
        Self {
            web,
            courses,
            fail,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> MutexGuard<'_, Vec<String>> {
        self.queries.lock().expect("queries lock")
    }

    fn answer(&self, query: &str, hits: &[SearchHit], max: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.queries().push(query.to_string());
        if self.fail {
            return Err(SearchError::Status(503));
        }
        Ok(hits.iter().take(max).cloned().collect())
    }
}

#[async_trait]
impl CourseSearch for StubSearch {
    async fn search_web(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.answer(query, &self.web, max_results)
    }

    async fn search_courses(
        &self,
        skill: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        self.answer(skill, &self.courses, max_results)
    }
}

/// Always fails the way an unparseable model reply would.
pub struct FailingPlanGenerator;

#[async_trait]
impl PlanGenerator for FailingPlanGenerator {
    async fn generate(&self, _request: &PlanRequest<'_>) -> Result<GeneratedPlan, PlanError> {
        Err(PlanError::Parse(PlanParseError::Empty))
    }
}

/// Returns the same plan for every request.
pub struct FixedPlanGenerator(pub GeneratedPlan);

#[async_trait]
impl PlanGenerator for FixedPlanGenerator {
    async fn generate(&self, _request: &PlanRequest<'_>) -> Result<GeneratedPlan, PlanError> {
        Ok(self.0.clone())
    }
}

/// Echoes a fixed reply, or fails when `None`.
pub struct StubResponder(pub Option<String>);

#[async_trait]
impl ChatResponder for StubResponder {
    async fn reply(&self, _prompt: &str) -> Result<String, LlmError> {
        self.0.clone().ok_or(LlmError::EmptyContent)
    }
}
