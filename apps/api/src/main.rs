mod advisor;
mod catalog;
mod config;
mod errors;
mod llm_client;
mod models;
mod profiles;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::advisor::chat::LlmResponder;
use crate::advisor::course_search::{CourseSearch, DisabledSearch, DuckDuckGoSearch};
use crate::advisor::plan_generator::LlmPlanGenerator;
use crate::advisor::AdvisorContext;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::profiles::store::ProfileStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Advisor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_timeout)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Reference tables and resolver options
    let advisor = AdvisorContext::builtin(config.resolver_options());
    info!(
        "Loaded roles {:?}, {} courses, {} vocabulary skills (time window: {})",
        advisor.roles.role_names(),
        advisor.catalog.len(),
        advisor.extractor.vocabulary().len(),
        if advisor.options.time_window.is_some() { "on" } else { "off" }
    );

    // Course search (DuckDuckGo by default; disable via ENABLE_COURSE_SEARCH=false)
    let course_search: Arc<dyn CourseSearch> = if config.enable_course_search {
        Arc::new(DuckDuckGoSearch::new(config.search_timeout)?)
    } else {
        info!("External course search disabled");
        Arc::new(DisabledSearch)
    };

    let state = AppState {
        advisor: Arc::new(advisor),
        plan_generator: Arc::new(LlmPlanGenerator(llm.clone())),
        course_search,
        responder: Arc::new(LlmResponder(llm)),
        store: Arc::new(ProfileStore::seeded()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
