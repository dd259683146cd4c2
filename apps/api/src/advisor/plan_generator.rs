//! Plan generation: the boundary between the typed advisor model and the
//! free-text reply of the language model.
//!
//! Flow: resolve gaps → look up external listings → generate plan.
//! A generation or parse failure is replaced by `GeneratedPlan::fallback()`;
//! it is never surfaced as an error. There is no automatic retry.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::advisor::course_search::{find_external_courses, CourseSearch};
use crate::advisor::extractor::ExtractedRequirement;
use crate::advisor::gap_resolver::{resolve_skill_gaps, SkillGapResolution};
use crate::advisor::prompts::{PLAN_PROMPT_TEMPLATE, PLAN_SYSTEM};
use crate::advisor::AdvisorContext;
use crate::llm_client::prompts::{fill_template, CATALOG_GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::plan::{GeneratedPlan, LearningPath, PathStatus};
use crate::models::profile::{LearningPreferences, Profile};

/// Candidate courses sent to the model, in catalog order.
const MAX_PROMPT_COURSES: usize = 15;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*(\{[\s\S]*\})\s*```").unwrap());

#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("plan reply was empty")]
    Empty,

    #[error("plan reply is not valid JSON: {0}")]
    Syntax(serde_json::Error),

    #[error("plan reply does not match the plan schema: {0}")]
    Schema(serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] PlanParseError),

    #[error("failed to build plan prompt: {0}")]
    Prompt(serde_json::Error),
}

/// Everything the plan generator is allowed to see.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub profile: &'a Profile,
    pub preferences: &'a LearningPreferences,
    pub resolution: &'a SkillGapResolution,
    pub extracted: Option<&'a ExtractedRequirement>,
}

/// Produces a structured plan from resolved gaps. Carried in `AppState` as
/// `Arc<dyn PlanGenerator>`.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, request: &PlanRequest<'_>) -> Result<GeneratedPlan, PlanError>;
}

/// Plan generator backed by the hosted language model.
pub struct LlmPlanGenerator(pub LlmClient);

#[async_trait]
impl PlanGenerator for LlmPlanGenerator {
    async fn generate(&self, request: &PlanRequest<'_>) -> Result<GeneratedPlan, PlanError> {
        let prompt = build_plan_prompt(request).map_err(PlanError::Prompt)?;
        let raw = self.0.call_text(&prompt, PLAN_SYSTEM).await?;
        Ok(parse_plan_response(&raw)?)
    }
}

/// Parse-or-fail boundary for model output.
///
/// Looks for a ```json fenced object first, then the outermost `{...}` span,
/// then tries the whole reply.
pub fn parse_plan_response(raw: &str) -> Result<GeneratedPlan, PlanParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PlanParseError::Empty);
    }

    let candidate = fenced_json(trimmed)
        .or_else(|| outer_object(trimmed))
        .unwrap_or(trimmed);

    serde_json::from_str(candidate).map_err(|e| {
        if e.is_data() {
            PlanParseError::Schema(e)
        } else {
            PlanParseError::Syntax(e)
        }
    })
}

fn fenced_json(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)?
        .get(1)
        .map(|m| m.as_str())
}

fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn join(items: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fills the plan template from the request.
pub fn build_plan_prompt(request: &PlanRequest<'_>) -> Result<String, serde_json::Error> {
    let profile = request.profile;
    let prefs = request.preferences;

    let proficiency_json = serde_json::to_string(&profile.skill_proficiency)?;
    let courses: Vec<_> = request
        .resolution
        .candidate_courses
        .iter()
        .take(MAX_PROMPT_COURSES)
        .collect();
    let courses_json = serde_json::to_string_pretty(&courses)?;
    let requirements_json = match request.extracted {
        Some(extracted) => serde_json::to_string(&serde_json::json!({
            "intents": extracted.intents,
            "mentioned_skills": extracted.mentioned_skills,
            "urgency": extracted.urgency,
        }))?,
        None => "None".to_string(),
    };
    let learning_style = serde_json::to_string(&prefs.preferred_learning_style)?;
    let difficulty = serde_json::to_string(&prefs.difficulty_preference)?;
    let urgency = serde_json::to_string(&prefs.learning_urgency)?;

    let time_weeks = request.resolution.effective_time_weeks.to_string();
    let skills = join(&profile.skills);
    let completed_courses = join(&profile.completed_courses);
    let career_goals = join(&profile.career_goals);
    let skill_gaps = join(&request.resolution.skill_gap);

    Ok(fill_template(
        PLAN_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_SYSTEM),
            ("grounding_instruction", CATALOG_GROUNDING_INSTRUCTION),
            ("current_role", &profile.current_role),
            ("skills", &skills),
            ("proficiency_json", &proficiency_json),
            ("completed_courses", &completed_courses),
            ("career_goals", &career_goals),
            ("time_weeks", &time_weeks),
            ("learning_style", learning_style.trim_matches('"')),
            ("difficulty", difficulty.trim_matches('"')),
            ("urgency", urgency.trim_matches('"')),
            ("skill_gaps", &skill_gaps),
            ("courses_json", &courses_json),
            ("requirements_json", &requirements_json),
        ],
    ))
}

/// Resolves gaps, gathers external listings, and asks the generator for a plan.
/// Always returns a path; generation failures yield the fallback plan.
pub async fn generate_learning_path(
    generator: &dyn PlanGenerator,
    search: &dyn CourseSearch,
    ctx: &AdvisorContext,
    profile: &Profile,
    preferences: &LearningPreferences,
    extracted: Option<&ExtractedRequirement>,
) -> LearningPath {
    let resolution = resolve_skill_gaps(
        profile,
        preferences,
        extracted,
        &ctx.roles,
        &ctx.catalog,
        &ctx.options,
    );
    info!(
        "Resolved {} gap skills and {} candidate courses for {}",
        resolution.skill_gap.len(),
        resolution.candidate_courses.len(),
        profile.employee_id
    );

    let lookup_skills: Vec<String> = if resolution.skill_gap.is_empty() {
        preferences.specific_skills_requested.clone()
    } else {
        resolution.skill_gap.iter().cloned().collect()
    };

    let external_courses = find_external_courses(search, &lookup_skills).await;

    let request = PlanRequest {
        profile,
        preferences,
        resolution: &resolution,
        extracted,
    };

    let outcome = generator.generate(&request).await;
    match outcome {
        Ok(plan) => {
            let ungrounded: Vec<&str> = plan
                .learning_path
                .iter()
                .filter(|c| ctx.catalog.get(&c.title).is_none())
                .map(|c| c.title.as_str())
                .collect();
            if !ungrounded.is_empty() {
                warn!(
                    "Plan for {} names courses outside the catalog: {ungrounded:?}",
                    profile.employee_id
                );
            }
            info!(
                "Generated plan with {} courses ({} weeks) for {}",
                plan.learning_path.len(),
                plan.total_duration_weeks,
                profile.employee_id
            );
            LearningPath::new(
                PathStatus::Generated,
                plan,
                resolution.skill_gap,
                external_courses,
            )
        }
        Err(e) => {
            warn!(
                "Plan generation failed for {}: {e}; substituting empty plan",
                profile.employee_id
            );
            LearningPath::new(
                PathStatus::Fallback,
                GeneratedPlan::fallback(),
                resolution.skill_gap,
                Vec::new(),
            )
        }
    }
}
