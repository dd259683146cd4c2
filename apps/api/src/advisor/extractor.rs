//! Requirement Extractor — keyword and pattern matching over one free-text chat message.
//!
//! Every test here is a substring test against the lower-cased input. This is
//! deliberately not tokenized: short skill names can match inside longer words,
//! and changing that changes observable output.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::SkillVocabulary;

/// Categorical intent detected in a chat message. Intents are independent; any
/// combination may co-occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RequestSpecificSkill,
    TimeConstraint,
    LearningPathRequest,
    SkillGapAnalysis,
    CareerGuidance,
    CourseFiltering,
    SearchRequest,
    ExternalCourseRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Structured requirements pulled out of a single message. Transient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRequirement {
    pub intents: BTreeSet<Intent>,
    /// 0 means "not specified", not "zero weeks".
    pub time_available_weeks: u32,
    pub mentioned_skills: Vec<String>,
    pub urgency: Urgency,
}

impl ExtractedRequirement {
    pub fn has_intent(&self, intent: Intent) -> bool {
        self.intents.contains(&intent)
    }
}

const INTENT_TRIGGERS: &[(Intent, &[&str])] = &[
    (
        Intent::RequestSpecificSkill,
        &["learn", "want to learn", "need to learn", "skill", "develop", "improve"],
    ),
    (
        Intent::TimeConstraint,
        &["week", "month", "time", "deadline", "urgent", "quickly", "fast"],
    ),
    (
        Intent::LearningPathRequest,
        &["learning path", "recommend courses", "suggest", "path", "roadmap"],
    ),
    (
        Intent::SkillGapAnalysis,
        &["gap", "missing", "lack", "need", "should learn"],
    ),
    (
        Intent::CareerGuidance,
        &["career", "role", "position", "promotion", "transition"],
    ),
    (
        Intent::CourseFiltering,
        &["beginner", "advanced", "intermediate", "easy", "difficult"],
    ),
    (
        Intent::SearchRequest,
        &["search", "find", "look for", "research", "information about"],
    ),
    (
        Intent::ExternalCourseRequest,
        &["udemy", "online course", "course recommendation", "external courses"],
    ),
];

/// Highest priority first; the first level with a hit wins.
const URGENCY_TRIGGERS: &[(Urgency, &[&str])] = &[
    (Urgency::Critical, &["urgent", "immediately", "asap", "critical"]),
    (Urgency::High, &["soon", "quickly", "fast", "priority"]),
    (Urgency::Medium, &["normal", "regular"]),
    (Urgency::Low, &["eventually", "when possible", "no rush"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Weeks,
    Months,
}

const WEEKS_PER_MONTH: u32 = 4;

/// Tried in order; the first pattern that matches decides, even if a later one would too.
static TIME_PATTERNS: Lazy<Vec<(Regex, TimeUnit)>> = Lazy::new(|| {
    [
        (r"(\d+)\s*weeks?", TimeUnit::Weeks),
        (r"(\d+)\s*months?", TimeUnit::Months),
        (r"in\s*(\d+)\s*weeks?", TimeUnit::Weeks),
        (r"within\s*(\d+)\s*weeks?", TimeUnit::Weeks),
    ]
    .into_iter()
    .map(|(pattern, unit)| (Regex::new(pattern).unwrap(), unit))
    .collect()
});

/// Extractor bound to a skill vocabulary.
#[derive(Debug, Clone)]
pub struct RequirementExtractor {
    vocabulary: SkillVocabulary,
}

impl RequirementExtractor {
    pub fn new(vocabulary: SkillVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn extract(&self, text: &str) -> ExtractedRequirement {
        extract_requirements(text, &self.vocabulary)
    }
}

/// Runs all four extractions over `text`. Pure; never fails.
pub fn extract_requirements(text: &str, vocabulary: &SkillVocabulary) -> ExtractedRequirement {
    let lowered = text.to_lowercase();
    ExtractedRequirement {
        intents: detect_intents(&lowered),
        time_available_weeks: extract_time_weeks(&lowered),
        mentioned_skills: mentioned_skills(&lowered, vocabulary),
        urgency: classify_urgency(&lowered),
    }
}

fn contains_any(lowered: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| lowered.contains(p))
}

fn detect_intents(lowered: &str) -> BTreeSet<Intent> {
    INTENT_TRIGGERS
        .iter()
        .filter(|(_, phrases)| contains_any(lowered, phrases))
        .map(|(intent, _)| *intent)
        .collect()
}

fn extract_time_weeks(lowered: &str) -> u32 {
    for (pattern, unit) in TIME_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(lowered) {
            // Digits only, so a parse failure can only mean overflow.
            let value = caps
                .get(1)
                .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
                .unwrap_or(0);
            return match unit {
                TimeUnit::Weeks => value,
                TimeUnit::Months => value.saturating_mul(WEEKS_PER_MONTH),
            };
        }
    }
    0
}

fn mentioned_skills(lowered: &str, vocabulary: &SkillVocabulary) -> Vec<String> {
    vocabulary
        .iter()
        .filter(|skill| lowered.contains(&skill.to_lowercase()))
        .cloned()
        .collect()
}

fn classify_urgency(lowered: &str) -> Urgency {
    URGENCY_TRIGGERS
        .iter()
        .find(|(_, phrases)| contains_any(lowered, phrases))
        .map(|(level, _)| *level)
        .unwrap_or_default()
}
