//! Axum route handlers for the advisor API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::advisor::chat::{handle_message, ChatDeps, ChatMessage, ChatReply, ChatRole};
use crate::advisor::extractor::ExtractedRequirement;
use crate::advisor::gap_analysis::{analyze_role_gaps, GapAnalysis};
use crate::advisor::gap_resolver::{resolve_skill_gaps, SkillGapResolution};
use crate::advisor::plan_generator::generate_learning_path;
use crate::catalog::{CourseCatalog, RoleTable};
use crate::errors::AppError;
use crate::models::plan::LearningPath;
use crate::profiles::handlers::load_session;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    /// Optional chat text whose time budget and skills shape the result.
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneratePathRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SkillGapsResponse {
    #[serde(flatten)]
    pub resolution: SkillGapResolution,
    pub role_analysis: GapAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractedRequirement>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

fn extract_optional(state: &AppState, message: Option<&str>) -> Option<ExtractedRequirement> {
    message
        .filter(|m| !m.trim().is_empty())
        .map(|m| state.advisor.extractor.extract(m))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Json<ExtractedRequirement> {
    Json(state.advisor.extractor.extract(&request.text))
}

/// GET /api/v1/catalog/roles
pub async fn handle_roles(State(state): State<AppState>) -> Json<RoleTable> {
    Json(state.advisor.roles.clone())
}

/// GET /api/v1/catalog/courses
pub async fn handle_courses(State(state): State<AppState>) -> Json<CourseCatalog> {
    Json(state.advisor.catalog.clone())
}

/// GET /api/v1/profiles/:id/skill-gaps
pub async fn handle_skill_gaps(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<SkillGapsResponse>, AppError> {
    let session = load_session(&state, &id).await?;
    let extracted = extract_optional(&state, query.message.as_deref());
    let ctx = &state.advisor;

    let resolution = resolve_skill_gaps(
        &session.profile,
        &session.preferences,
        extracted.as_ref(),
        &ctx.roles,
        &ctx.catalog,
        &ctx.options,
    );
    let role_analysis = analyze_role_gaps(&session.profile, &ctx.roles);

    Ok(Json(SkillGapsResponse {
        resolution,
        role_analysis,
        extracted,
    }))
}

/// POST /api/v1/profiles/:id/learning-path
///
/// Generates a path and stores it as the profile's current path. Generation
/// failures still return 200 with the fallback plan (`status: "fallback"`).
pub async fn handle_generate_path(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<GeneratePathRequest>>,
) -> Result<Json<LearningPath>, AppError> {
    let session = load_session(&state, &id).await?;
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let extracted = extract_optional(&state, request.message.as_deref());

    let path = generate_learning_path(
        state.plan_generator.as_ref(),
        state.course_search.as_ref(),
        &state.advisor,
        &session.profile,
        &session.preferences,
        extracted.as_ref(),
    )
    .await;

    if !state.store.assign_learning_path(&id, path.clone()).await {
        return Err(AppError::NotFound(format!("Profile {id} not found")));
    }
    Ok(Json(path))
}

/// GET /api/v1/profiles/:id/learning-path
pub async fn handle_get_path(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LearningPath>, AppError> {
    load_session(&state, &id)
        .await?
        .learning_path
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No learning path assigned to {id}")))
}

/// PUT /api/v1/profiles/:id/learning-path
///
/// Assigns a path (e.g. a manager-edited one), replacing the current path.
pub async fn handle_assign_path(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(path): Json<LearningPath>,
) -> Result<Json<LearningPath>, AppError> {
    if !state.store.assign_learning_path(&id, path.clone()).await {
        return Err(AppError::NotFound(format!("Profile {id} not found")));
    }
    Ok(Json(path))
}

/// POST /api/v1/profiles/:id/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let text = request.message.trim();
    if text.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let mut session = load_session(&state, &id).await?;
    let deps = ChatDeps {
        ctx: &state.advisor,
        generator: state.plan_generator.as_ref(),
        search: state.course_search.as_ref(),
        responder: state.responder.as_ref(),
    };
    let reply = handle_message(
        deps,
        &session.profile,
        &mut session.preferences,
        &session.messages,
        text,
    )
    .await;

    // Merged under the store lock; a preferences PUT made during the turn is kept.
    state.store.absorb_preferences(&id, &reply.extracted).await;
    if let Some(path) = &reply.learning_path {
        state.store.assign_learning_path(&id, path.clone()).await;
    }
    state
        .store
        .append_messages(
            &id,
            [
                ChatMessage::new(ChatRole::User, text),
                ChatMessage::new(ChatRole::Assistant, reply.message.clone()),
            ],
        )
        .await;

    Ok(Json(reply))
}
