//! Axum route handlers for profiles and learning preferences.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::{LearningPreferences, Profile};
use crate::profiles::store::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub manager_id: Option<String>,
}

/// Saved profile plus any skills the reference tables do not recognize.
#[derive(Debug, Serialize)]
pub struct ProfileUpdate {
    #[serde(flatten)]
    pub profile: Profile,
    pub unknown_skills: Vec<String>,
}

pub(crate) async fn load_session(state: &AppState, employee_id: &str) -> Result<Session, AppError> {
    state
        .store
        .get(employee_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Profile {employee_id} not found")))
}

/// GET /api/v1/profiles
pub async fn handle_list_profiles(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Profile>> {
    Json(state.store.list(query.manager_id.as_deref()).await)
}

/// GET /api/v1/profiles/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(load_session(&state, &id).await?))
}

/// PUT /api/v1/profiles/:id
///
/// Creates the profile when the id is new. The body's employee_id must match the path.
/// Unrecognized skills are saved anyway and listed in `unknown_skills`.
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(profile): Json<Profile>,
) -> Result<Json<ProfileUpdate>, AppError> {
    if profile.employee_id != id {
        return Err(AppError::Validation(format!(
            "employee_id '{}' does not match path id '{id}'",
            profile.employee_id
        )));
    }
    if profile.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let profile = state.store.upsert_profile(profile).await;
    let unknown_skills = state.advisor.extractor.vocabulary().unknown(&profile.skills);
    if !unknown_skills.is_empty() {
        info!("Profile {id} lists skills outside the vocabulary: {unknown_skills:?}");
    }
    Ok(Json(ProfileUpdate {
        profile,
        unknown_skills,
    }))
}

/// GET /api/v1/profiles/:id/preferences
pub async fn handle_get_preferences(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LearningPreferences>, AppError> {
    Ok(Json(load_session(&state, &id).await?.preferences))
}

/// PUT /api/v1/profiles/:id/preferences
pub async fn handle_put_preferences(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(preferences): Json<LearningPreferences>,
) -> Result<Json<LearningPreferences>, AppError> {
    if !state.store.put_preferences(&id, preferences.clone()).await {
        return Err(AppError::NotFound(format!("Profile {id} not found")));
    }
    Ok(Json(preferences))
}
