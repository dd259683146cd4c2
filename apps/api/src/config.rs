use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::advisor::gap_resolver::{ResolverOptions, TimeWindow};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Duration-window filtering of candidate courses. Off unless enabled.
    pub enable_time_window_filter: bool,
    pub time_window_below_weeks: f32,
    pub time_window_above_weeks: f32,
    pub enable_course_search: bool,
    pub search_timeout: Duration,
    pub llm_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            enable_time_window_filter: env_or("ENABLE_TIME_WINDOW_FILTER", false)?,
            time_window_below_weeks: env_or("TIME_WINDOW_BELOW_WEEKS", 2.0)?,
            time_window_above_weeks: env_or("TIME_WINDOW_ABOVE_WEEKS", 1.0)?,
            enable_course_search: env_or("ENABLE_COURSE_SEARCH", true)?,
            search_timeout: Duration::from_secs(env_or("SEARCH_TIMEOUT_SECS", 15)?),
            llm_timeout: Duration::from_secs(env_or("LLM_TIMEOUT_SECS", 60)?),
        })
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            time_window: self.enable_time_window_filter.then(|| TimeWindow {
                below_weeks: self.time_window_below_weeks,
                above_weeks: self.time_window_above_weeks,
                ..TimeWindow::default()
            }),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value '{raw}'"))
}
