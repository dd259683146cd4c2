pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisor::handlers as advisor;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/extract", post(advisor::handle_extract))
        .route("/api/v1/catalog/roles", get(advisor::handle_roles))
        .route("/api/v1/catalog/courses", get(advisor::handle_courses))
        // Profiles & preferences
        .route("/api/v1/profiles", get(profiles::handle_list_profiles))
        .route(
            "/api/v1/profiles/:id",
            get(profiles::handle_get_profile).put(profiles::handle_put_profile),
        )
        .route(
            "/api/v1/profiles/:id/preferences",
            get(profiles::handle_get_preferences).put(profiles::handle_put_preferences),
        )
        // Advisor
        .route(
            "/api/v1/profiles/:id/skill-gaps",
            get(advisor::handle_skill_gaps),
        )
        .route(
            "/api/v1/profiles/:id/learning-path",
            get(advisor::handle_get_path)
                .post(advisor::handle_generate_path)
                .put(advisor::handle_assign_path),
        )
        .route("/api/v1/profiles/:id/chat", post(advisor::handle_chat))
        .with_state(state)
}
