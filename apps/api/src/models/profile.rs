use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::advisor::extractor::{ExtractedRequirement, Urgency};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
}

/// Ordinal experience level; declaration order is seniority order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "Entry Level")]
    EntryLevel,
    Junior,
    #[default]
    #[serde(rename = "Mid-level")]
    MidLevel,
    Senior,
    Expert,
}

/// An employee's skills and goals. Only changed through explicit profile edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub employee_id: String,
    pub name: String,
    /// May name a role absent from the role table; gap computation then treats
    /// the role as having no requirements.
    pub current_role: String,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub skill_proficiency: BTreeMap<String, Proficiency>,
    #[serde(default)]
    pub completed_courses: BTreeSet<String>,
    #[serde(default)]
    pub career_goals: Vec<String>,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Profile {
    /// Drops proficiency entries for skills no longer held and duplicate goals.
    pub fn normalize(&mut self) {
        let skills = &self.skills;
        self.skill_proficiency.retain(|skill, _| skills.contains(skill));

        let mut seen = BTreeSet::new();
        self.career_goals.retain(|goal| seen.insert(goal.clone()));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningStyle {
    #[default]
    Mixed,
    Visual,
    Auditory,
    #[serde(rename = "Hands-on")]
    HandsOn,
    Interactive,
    Intensive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyPreference {
    #[default]
    Progressive,
    Beginner,
    Intermediate,
    Advanced,
}

const DEFAULT_TIME_BUDGET_WEEKS: u32 = 8;

fn default_time_budget() -> u32 {
    DEFAULT_TIME_BUDGET_WEEKS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPreferences {
    #[serde(default = "default_time_budget")]
    pub time_available_weeks: u32,
    #[serde(default)]
    pub preferred_learning_style: LearningStyle,
    #[serde(default)]
    pub difficulty_preference: DifficultyPreference,
    #[serde(default)]
    pub specific_skills_requested: Vec<String>,
    #[serde(default)]
    pub learning_urgency: Urgency,
}

impl Default for LearningPreferences {
    fn default() -> Self {
        Self {
            time_available_weeks: DEFAULT_TIME_BUDGET_WEEKS,
            preferred_learning_style: LearningStyle::default(),
            difficulty_preference: DifficultyPreference::default(),
            specific_skills_requested: Vec::new(),
            learning_urgency: Urgency::default(),
        }
    }
}

impl LearningPreferences {
    /// Folds a chat extraction into the preferences: an explicit time replaces the
    /// budget, mentioned skills are appended once. Urgency is left alone.
    pub fn absorb(&mut self, extracted: &ExtractedRequirement) {
        if extracted.time_available_weeks > 0 {
            self.time_available_weeks = extracted.time_available_weeks;
        }
        for skill in &extracted.mentioned_skills {
            if !self.specific_skills_requested.contains(skill) {
                self.specific_skills_requested.push(skill.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn extraction(weeks: u32, skills: &[&str]) -> ExtractedRequirement {
        ExtractedRequirement {
            intents: BTreeSet::new(),
            time_available_weeks: weeks,
            mentioned_skills: skills.iter().map(|s| s.to_string()).collect(),
            urgency: Urgency::Critical,
        }
    }

    #[test]
    fn test_profile_deserializes_with_defaults() {
        let json = r#"{
            "employee_id": "EMP1",
            "name": "Test",
            "current_role": "Data Analyst",
            "skills": ["SQL", "SQL", "Excel"]
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.skills.len(), 2);
        assert_eq!(profile.experience_level, ExperienceLevel::MidLevel);
        assert!(profile.career_goals.is_empty());
        assert!(profile.manager_id.is_none());
    }

    #[test]
    fn test_experience_level_uses_display_names() {
        let level: ExperienceLevel = serde_json::from_str(r#""Entry Level""#).unwrap();
        assert_eq!(level, ExperienceLevel::EntryLevel);
        assert!(ExperienceLevel::Junior < ExperienceLevel::Senior);
        assert_eq!(
            serde_json::to_string(&ExperienceLevel::MidLevel).unwrap(),
            r#""Mid-level""#
        );
    }

    #[test]
    fn test_normalize_prunes_orphan_proficiency_and_duplicate_goals() {
        let mut profile = Profile {
            employee_id: "EMP1".to_string(),
            name: "Test".to_string(),
            current_role: "Data Analyst".to_string(),
            skills: ["SQL".to_string()].into_iter().collect(),
            skill_proficiency: [
                ("SQL".to_string(), Proficiency::Advanced),
                ("Excel".to_string(), Proficiency::Beginner),
            ]
            .into_iter()
            .collect(),
            completed_courses: BTreeSet::new(),
            career_goals: vec![
                "Data Scientist".to_string(),
                "AI Specialist".to_string(),
                "Data Scientist".to_string(),
            ],
            experience_level: ExperienceLevel::Junior,
            manager_id: None,
            department: None,
        };
        profile.normalize();
        assert_eq!(profile.skill_proficiency.len(), 1);
        assert!(profile.skill_proficiency.contains_key("SQL"));
        assert_eq!(profile.career_goals, vec!["Data Scientist", "AI Specialist"]);
    }

    #[test]
    fn test_preferences_default() {
        let prefs = LearningPreferences::default();
        assert_eq!(prefs.time_available_weeks, 8);
        assert_eq!(prefs.preferred_learning_style, LearningStyle::Mixed);
        assert_eq!(prefs.difficulty_preference, DifficultyPreference::Progressive);
        assert_eq!(prefs.learning_urgency, Urgency::Medium);
    }

    #[test]
    fn test_absorb_replaces_time_only_when_specified() {
        let mut prefs = LearningPreferences::default();
        prefs.absorb(&extraction(0, &[]));
        assert_eq!(prefs.time_available_weeks, 8);
        prefs.absorb(&extraction(3, &[]));
        assert_eq!(prefs.time_available_weeks, 3);
    }

    #[test]
    fn test_absorb_appends_skills_once_and_keeps_urgency() {
        let mut prefs = LearningPreferences::default();
        prefs.absorb(&extraction(0, &["Python"]));
        prefs.absorb(&extraction(0, &["Python", "SQL"]));
        assert_eq!(prefs.specific_skills_requested, vec!["Python", "SQL"]);
        assert_eq!(prefs.learning_urgency, Urgency::Medium);
    }

    #[test]
    fn test_learning_style_hands_on_name() {
        let style: LearningStyle = serde_json::from_str(r#""Hands-on""#).unwrap();
        assert_eq!(style, LearningStyle::HandsOn);
    }
}
