//! Chat turn handling: extract requirements, fold them into preferences, then
//! route on intent.
//!
//! Routing precedence: search → learning path → gap analysis → conversation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::advisor::course_search::{
    learning_resources, search_query_from, CourseSearch, LearningResources, SearchHit,
};
use crate::advisor::extractor::{ExtractedRequirement, Intent};
use crate::advisor::gap_analysis::{analyze_role_gaps, GapAnalysis};
use crate::advisor::plan_generator::{generate_learning_path, PlanGenerator};
use crate::advisor::prompts::{CHAT_PROMPT_TEMPLATE, CHAT_SYSTEM};
use crate::advisor::AdvisorContext;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::plan::{LearningPath, PathStatus};
use crate::models::profile::{LearningPreferences, Profile};

const SEARCH_RESULTS: usize = 5;
const SNIPPET_CHARS: usize = 200;
/// Critical gaps that get an automatic resource lookup.
const GAP_RESOURCE_SKILLS: usize = 2;
const RESOURCES_PER_GAP: usize = 3;
/// Prior messages quoted back to the conversational model.
const CONTEXT_MESSAGES: usize = 5;

pub const CONVERSATION_FALLBACK: &str = "I'm having trouble processing your request right now. \
    Could you try rephrasing it, or would you like me to search for information or create a learning path?";

pub const PATH_FAILED: &str = "I couldn't generate a learning path right now. Please try again in a moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    SearchResults,
    LearningPath,
    GapAnalysis,
    Conversation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub kind: ReplyKind,
    pub message: String,
    pub extracted: ExtractedRequirement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_path: Option<LearningPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_analysis: Option<GapAnalysis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<LearningResources>,
}

/// Free-form conversational reply backend.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn reply(&self, prompt: &str) -> Result<String, LlmError>;
}

pub struct LlmResponder(pub LlmClient);

#[async_trait]
impl ChatResponder for LlmResponder {
    async fn reply(&self, prompt: &str) -> Result<String, LlmError> {
        self.0.call_text(prompt, CHAT_SYSTEM).await
    }
}

/// Backends a chat turn may call.
#[derive(Clone, Copy)]
pub struct ChatDeps<'a> {
    pub ctx: &'a AdvisorContext,
    pub generator: &'a dyn PlanGenerator,
    pub search: &'a dyn CourseSearch,
    pub responder: &'a dyn ChatResponder,
}

/// Handles one user message. `preferences` absorbs the extraction before
/// routing; `history` is the conversation so far, excluding `text`.
pub async fn handle_message(
    deps: ChatDeps<'_>,
    profile: &Profile,
    preferences: &mut LearningPreferences,
    history: &[ChatMessage],
    text: &str,
) -> ChatReply {
    let extracted = deps.ctx.extractor.extract(text);
    preferences.absorb(&extracted);
    info!(
        "Chat message for {}: intents={:?} weeks={} skills={:?}",
        profile.employee_id,
        extracted.intents,
        extracted.time_available_weeks,
        extracted.mentioned_skills
    );

    let mut reply = ChatReply {
        kind: ReplyKind::Conversation,
        message: String::new(),
        extracted,
        learning_path: None,
        gap_analysis: None,
        search_results: Vec::new(),
        resources: Vec::new(),
    };

    if reply.extracted.has_intent(Intent::SearchRequest) {
        let query = search_query_from(text);
        let hits = match deps.search.search_web(&query, SEARCH_RESULTS).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Web search for '{query}' failed: {e}");
                Vec::new()
            }
        };
        reply.kind = ReplyKind::SearchResults;
        reply.message = search_message(&query, &hits);
        reply.search_results = hits;
    } else if reply.extracted.has_intent(Intent::LearningPathRequest)
        || reply.extracted.has_intent(Intent::RequestSpecificSkill)
    {
        let path = generate_learning_path(
            deps.generator,
            deps.search,
            deps.ctx,
            profile,
            preferences,
            Some(&reply.extracted),
        )
        .await;
        reply.kind = ReplyKind::LearningPath;
        reply.message = path_message(&reply.extracted, &path);
        reply.learning_path = Some(path);
    } else if reply.extracted.has_intent(Intent::SkillGapAnalysis) {
        let analysis = analyze_role_gaps(profile, &deps.ctx.roles);
        let mut message = analysis.summary();
        for skill in analysis.critical_gaps.iter().take(GAP_RESOURCE_SKILLS) {
            let found = learning_resources(deps.search, skill).await;
            if !found.resources.is_empty() {
                message.push_str(&format!("\n\nLearning resources for {skill}:"));
                for resource in found.resources.iter().take(RESOURCES_PER_GAP) {
                    message.push_str(&format!("\n- {} ({})", resource.title, resource.url));
                }
            }
            reply.resources.push(found);
        }
        reply.kind = ReplyKind::GapAnalysis;
        reply.message = message;
        reply.gap_analysis = Some(analysis);
    } else {
        reply.message = match build_chat_prompt(profile, &reply.extracted, history, text) {
            Ok(prompt) => match deps.responder.reply(&prompt).await {
                Ok(answer) => answer,
                Err(e) => {
                    warn!("Conversational reply failed: {e}");
                    CONVERSATION_FALLBACK.to_string()
                }
            },
            Err(e) => {
                warn!("Failed to build chat prompt: {e}");
                CONVERSATION_FALLBACK.to_string()
            }
        };
    }

    reply
}

fn search_message(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!(
            "I couldn't find specific search results for '{query}', but I can help you \
            create a learning path or find courses related to your interests. What would you like to learn?"
        );
    }
    let mut message = format!("Search results for: {query}\n");
    for (i, hit) in hits.iter().enumerate() {
        let snippet: String = hit.snippet.chars().take(SNIPPET_CHARS).collect();
        message.push_str(&format!("\n{}. {}\n{}\n{}\n", i + 1, hit.title, hit.url, snippet));
    }
    message.push_str(
        "\nWould you like me to search for anything else or help create a learning path based on this information?",
    );
    message
}

fn path_message(extracted: &ExtractedRequirement, path: &LearningPath) -> String {
    let time = if extracted.time_available_weeks > 0 {
        format!("{} weeks", extracted.time_available_weeks)
    } else {
        "not specified".to_string()
    };
    let skills = if extracted.mentioned_skills.is_empty() {
        "Based on your career goals".to_string()
    } else {
        extracted.mentioned_skills.join(", ")
    };
    if path.status == PathStatus::Fallback {
        return PATH_FAILED.to_string();
    }
    let plan = &path.plan;
    format!(
        "Personalized learning path created.\n\n\
        Time constraint: {time}\n\
        Skills requested: {skills}\n\
        Total duration: {} weeks\n\n\
        Strategy: {}\n\n\
        Learning progression: {}\n\n\
        Alternative options: {}\n\n\
        Found {} external courses that complement this path.",
        plan.total_duration_weeks,
        plan.explanation,
        plan.progression_notes,
        plan.alternative_suggestions,
        path.external_courses.len(),
    )
}

fn build_chat_prompt(
    profile: &Profile,
    extracted: &ExtractedRequirement,
    history: &[ChatMessage],
    text: &str,
) -> Result<String, serde_json::Error> {
    let requirements_json = serde_json::to_string(extracted)?;
    let intents = serde_json::to_value(&extracted.intents)?
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    let skip = history.len().saturating_sub(CONTEXT_MESSAGES);
    let history_text = history[skip..]
        .iter()
        .map(|m| {
            let role = match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            format!("{role}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n");
    let skills = profile
        .skills
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    Ok(fill_template(
        CHAT_PROMPT_TEMPLATE,
        &[
            ("current_role", &profile.current_role),
            ("skills", &skills),
            ("intents", &intents),
            ("requirements_json", &requirements_json),
            ("history", &history_text),
            ("message", text),
        ],
    ))
}
