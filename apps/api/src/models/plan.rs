use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text shown when plan generation fails and the empty plan is substituted.
pub const FALLBACK_EXPLANATION: &str = "Error generating learning path. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(alias = "critical")]
    Critical,
    #[serde(alias = "high")]
    High,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

/// One course in a generated plan, as returned by the plan generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedCourse {
    pub title: String,
    #[serde(rename = "type", default)]
    pub course_type: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub duration_weeks: f32,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub skills_gained: Vec<String>,
    #[serde(default)]
    pub fits_constraints: String,
}

/// Typed shape of a plan-generator reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub learning_path: Vec<RecommendedCourse>,
    pub total_duration_weeks: f32,
    pub explanation: String,
    #[serde(default)]
    pub skill_gaps_addressed: Vec<String>,
    #[serde(default)]
    pub progression_notes: String,
    #[serde(default)]
    pub alternative_suggestions: String,
}

impl GeneratedPlan {
    /// The empty plan substituted whenever generation fails.
    pub fn fallback() -> Self {
        Self {
            learning_path: Vec::new(),
            total_duration_weeks: 0.0,
            explanation: FALLBACK_EXPLANATION.to_string(),
            skill_gaps_addressed: Vec::new(),
            progression_notes: String::new(),
            alternative_suggestions: String::new(),
        }
    }
}

/// A course listing found outside the internal catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalCourse {
    pub title: String,
    pub url: String,
    pub description: String,
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    Generated,
    Fallback,
}

/// The single "current" learning path held for a profile. Replaced wholesale on
/// every generation or assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub status: PathStatus,
    #[serde(flatten)]
    pub plan: GeneratedPlan,
    /// Gap the plan was generated against. May be stale relative to later profile edits.
    #[serde(default)]
    pub skill_gap: BTreeSet<String>,
    #[serde(default)]
    pub external_courses: Vec<ExternalCourse>,
}

impl LearningPath {
    pub fn new(
        status: PathStatus,
        plan: GeneratedPlan,
        skill_gap: BTreeSet<String>,
        external_courses: Vec<ExternalCourse>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            status,
            plan,
            skill_gap,
            external_courses,
        }
    }
}
