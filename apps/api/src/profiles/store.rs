//! In-process session store keyed by employee id.
//!
//! Reads hand out owned copies; every write replaces the stored value. Nothing is
//! persisted across restarts.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::advisor::chat::ChatMessage;
use crate::advisor::extractor::ExtractedRequirement;
use crate::models::plan::LearningPath;
use crate::models::profile::{ExperienceLevel, LearningPreferences, Proficiency, Profile};

/// Messages kept per session; older ones are dropped first.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub profile: Profile,
    pub preferences: LearningPreferences,
    pub learning_path: Option<LearningPath>,
    pub messages: Vec<ChatMessage>,
}

impl Session {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            preferences: LearningPreferences::default(),
            learning_path: None,
            messages: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProfileStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl ProfileStore {
    pub fn new(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let sessions = profiles
            .into_iter()
            .map(|p| (p.employee_id.clone(), Session::new(p)))
            .collect();
        Self {
            sessions: RwLock::new(sessions),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_profiles())
    }

    /// Profiles ordered by employee id, optionally limited to one manager's reports.
    pub async fn list(&self, manager_id: Option<&str>) -> Vec<Profile> {
        let sessions = self.sessions.read().await;
        let mut profiles: Vec<Profile> = sessions
            .values()
            .map(|s| &s.profile)
            .filter(|p| manager_id.map_or(true, |m| p.manager_id.as_deref() == Some(m)))
            .cloned()
            .collect();
        profiles.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        profiles
    }

    pub async fn get(&self, employee_id: &str) -> Option<Session> {
        self.sessions.read().await.get(employee_id).cloned()
    }

    /// Inserts or replaces a profile. Preferences, path, and history survive a replace.
    pub async fn upsert_profile(&self, mut profile: Profile) -> Profile {
        profile.normalize();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&profile.employee_id) {
            Some(session) => session.profile = profile.clone(),
            None => {
                info!("Creating session for {}", profile.employee_id);
                sessions.insert(profile.employee_id.clone(), Session::new(profile.clone()));
            }
        }
        profile
    }

    /// Returns false when the employee is unknown.
    pub async fn put_preferences(&self, employee_id: &str, preferences: LearningPreferences) -> bool {
        match self.sessions.write().await.get_mut(employee_id) {
            Some(session) => {
                session.preferences = preferences;
                true
            }
            None => false,
        }
    }

    /// Merges what a chat turn extracted into the stored preferences, keeping every
    /// other field as it is now. Returns false when the employee is unknown.
    pub async fn absorb_preferences(&self, employee_id: &str, extracted: &ExtractedRequirement) -> bool {
        match self.sessions.write().await.get_mut(employee_id) {
            Some(session) => {
                session.preferences.absorb(extracted);
                true
            }
            None => false,
        }
    }

    /// Replaces the current path wholesale. Returns false when the employee is unknown.
    pub async fn assign_learning_path(&self, employee_id: &str, path: LearningPath) -> bool {
        match self.sessions.write().await.get_mut(employee_id) {
            Some(session) => {
                info!("Assigned learning path {} to {employee_id}", path.id);
                session.learning_path = Some(path);
                true
            }
            None => false,
        }
    }

    /// Appends messages and trims the history to `MAX_HISTORY`.
    pub async fn append_messages(
        &self,
        employee_id: &str,
        messages: impl IntoIterator<Item = ChatMessage>,
    ) -> bool {
        match self.sessions.write().await.get_mut(employee_id) {
            Some(session) => {
                session.messages.extend(messages);
                let excess = session.messages.len().saturating_sub(MAX_HISTORY);
                session.messages.drain(..excess);
                true
            }
            None => false,
        }
    }
}

fn skill_set(skills: &[&str]) -> BTreeSet<String> {
    skills.iter().map(|s| s.to_string()).collect()
}

fn proficiency(entries: &[(&str, Proficiency)]) -> BTreeMap<String, Proficiency> {
    entries.iter().map(|(s, p)| (s.to_string(), *p)).collect()
}

/// The sample employees the service starts with, all reporting to MGR001.
pub fn seed_profiles() -> Vec<Profile> {
    vec![
        Profile {
            employee_id: "EMP123456".to_string(),
            name: "Alex Johnson".to_string(),
            current_role: "Data Analyst".to_string(),
            skills: skill_set(&["SQL", "Excel", "Data Visualization"]),
            skill_proficiency: proficiency(&[
                ("SQL", Proficiency::Intermediate),
                ("Excel", Proficiency::Advanced),
                ("Data Visualization", Proficiency::Intermediate),
            ]),
            completed_courses: skill_set(&["Data Analysis Fundamentals", "Excel Advanced"]),
            career_goals: vec!["Data Science Manager".to_string(), "AI Specialist".to_string()],
            experience_level: ExperienceLevel::MidLevel,
            manager_id: Some("MGR001".to_string()),
            department: Some("Analytics".to_string()),
        },
        Profile {
            employee_id: "EMP789012".to_string(),
            name: "Sarah Chen".to_string(),
            current_role: "Junior Data Analyst".to_string(),
            skills: skill_set(&["Excel", "Python"]),
            skill_proficiency: proficiency(&[
                ("Excel", Proficiency::Intermediate),
                ("Python", Proficiency::Beginner),
            ]),
            completed_courses: skill_set(&["Data Analysis Fundamentals"]),
            career_goals: vec!["Data Analyst".to_string(), "Data Scientist".to_string()],
            experience_level: ExperienceLevel::Junior,
            manager_id: Some("MGR001".to_string()),
            department: Some("Analytics".to_string()),
        },
        Profile {
            employee_id: "EMP345678".to_string(),
            name: "Michael Rodriguez".to_string(),
            current_role: "Business Analyst".to_string(),
            skills: skill_set(&["Excel"]),
            skill_proficiency: proficiency(&[("Excel", Proficiency::Advanced)]),
            completed_courses: skill_set(&["Data Analysis Fundamentals"]),
            career_goals: vec!["Data Scientist".to_string()],
            experience_level: ExperienceLevel::MidLevel,
            manager_id: Some("MGR001".to_string()),
            department: Some("Business".to_string()),
        },
    ]
}
