//! Skill-Gap Resolver — diffs a profile against the role table and filters the catalog.
//!
//! Pure over caller-supplied values. Lookup misses (unknown role or goal) contribute
//! nothing and are never reported as errors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::advisor::extractor::ExtractedRequirement;
use crate::catalog::{CourseCatalog, CourseRecord, RoleTable};
use crate::models::profile::{LearningPreferences, Profile};

/// Duration band around a requested time budget. A course is kept when
/// `max(floor, weeks - below) <= duration_weeks <= weeks + above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub below_weeks: f32,
    pub above_weeks: f32,
    pub floor_weeks: f32,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            below_weeks: 2.0,
            above_weeks: 1.0,
            floor_weeks: 1.0,
        }
    }
}

impl TimeWindow {
    pub fn admits(&self, duration_weeks: f32, budget_weeks: u32) -> bool {
        let budget = budget_weeks as f32;
        let lower = (budget - self.below_weeks).max(self.floor_weeks);
        duration_weeks >= lower && duration_weeks <= budget + self.above_weeks
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolverOptions {
    /// `None` disables duration filtering entirely.
    pub time_window: Option<TimeWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGapResolution {
    /// Ordered for stable output only; consumers must treat this as a set.
    pub skill_gap: BTreeSet<String>,
    /// Catalog order.
    pub candidate_courses: Vec<CourseRecord>,
    /// Budget the time window was evaluated against (0 = unspecified).
    pub effective_time_weeks: u32,
}

/// The time budget a request should honor: an explicit figure from the message
/// wins over the stored preference.
pub fn effective_time_weeks(
    preferences: &LearningPreferences,
    extracted: Option<&ExtractedRequirement>,
) -> u32 {
    match extracted {
        Some(e) if e.time_available_weeks > 0 => e.time_available_weeks,
        _ => preferences.time_available_weeks,
    }
}

/// Skills demanded by the current role (required only) and by each known career
/// goal (required and preferred).
pub fn required_skills(profile: &Profile, roles: &RoleTable) -> BTreeSet<String> {
    let mut required: BTreeSet<String> = roles
        .get(&profile.current_role)
        .map(|r| r.required_skills.iter().cloned().collect())
        .unwrap_or_default();

    for goal in &profile.career_goals {
        if let Some(goal_reqs) = roles.get(goal) {
            required.extend(goal_reqs.required_skills.iter().cloned());
            required.extend(goal_reqs.preferred_skills.iter().cloned());
        }
    }
    required
}

/// Computes the unmet skill set for a profile.
pub fn compute_skill_gap(
    profile: &Profile,
    preferences: &LearningPreferences,
    extracted: Option<&ExtractedRequirement>,
    roles: &RoleTable,
) -> BTreeSet<String> {
    let current = &profile.skills;
    let mut gap: BTreeSet<String> = required_skills(profile, roles)
        .into_iter()
        .filter(|s| !current.contains(s))
        .collect();

    gap.extend(
        preferences
            .specific_skills_requested
            .iter()
            .filter(|s| !current.contains(*s))
            .cloned(),
    );

    if let Some(extracted) = extracted {
        gap.extend(
            extracted
                .mentioned_skills
                .iter()
                .filter(|s| !current.contains(*s))
                .cloned(),
        );
    }
    gap
}

/// Catalog courses that teach at least one gap skill and have not been completed.
pub fn filter_courses(
    catalog: &CourseCatalog,
    gap: &BTreeSet<String>,
    completed: &BTreeSet<String>,
    time_budget_weeks: u32,
    options: &ResolverOptions,
) -> Vec<CourseRecord> {
    catalog
        .iter()
        .filter(|course| match options.time_window {
            Some(window) if time_budget_weeks > 0 => {
                window.admits(course.duration_weeks, time_budget_weeks)
            }
            _ => true,
        })
        .filter(|course| course.covers_any(gap.iter()))
        .filter(|course| !completed.contains(&course.title))
        .cloned()
        .collect()
}

/// Full resolution: gap set plus candidate courses for the plan generator.
pub fn resolve_skill_gaps(
    profile: &Profile,
    preferences: &LearningPreferences,
    extracted: Option<&ExtractedRequirement>,
    roles: &RoleTable,
    catalog: &CourseCatalog,
    options: &ResolverOptions,
) -> SkillGapResolution {
    let skill_gap = compute_skill_gap(profile, preferences, extracted, roles);
    let weeks = effective_time_weeks(preferences, extracted);
    let candidate_courses =
        filter_courses(catalog, &skill_gap, &profile.completed_courses, weeks, options);

    SkillGapResolution {
        skill_gap,
        candidate_courses,
        effective_time_weeks: weeks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::extractor::Urgency;
    use crate::models::profile::ExperienceLevel;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn analyst(skills: &[&str], goals: &[&str]) -> Profile {
        Profile {
            employee_id: "EMP1".to_string(),
            name: "Alex".to_string(),
            current_role: "Data Analyst".to_string(),
            skills: set(skills),
            skill_proficiency: Default::default(),
            completed_courses: BTreeSet::new(),
            career_goals: goals.iter().map(|s| s.to_string()).collect(),
            experience_level: ExperienceLevel::MidLevel,
            manager_id: None,
            department: None,
        }
    }

    fn resolve(profile: &Profile, prefs: &LearningPreferences) -> SkillGapResolution {
        resolve_skill_gaps(
            profile,
            prefs,
            None,
            &RoleTable::builtin(),
            &CourseCatalog::builtin(),
            &ResolverOptions::default(),
        )
    }

    #[test]
    fn test_role_required_gap() {
        let profile = analyst(&["SQL", "Excel", "Data Visualization"], &[]);
        let res = resolve(&profile, &LearningPreferences::default());
        assert_eq!(res.skill_gap, set(&["Statistics"]));
    }

    #[test]
    fn test_goal_adds_required_and_preferred() {
        let profile = analyst(&["SQL", "Excel", "Data Visualization"], &["Data Scientist"]);
        let res = resolve(&profile, &LearningPreferences::default());
        // Required of the goal: Python, Machine Learning, Statistics (Data Visualization held).
        for skill in ["Statistics", "Python", "Machine Learning"] {
            assert!(res.skill_gap.contains(skill), "missing {skill}");
        }
        // Goal preferred skills are included too.
        for skill in ["Deep Learning", "Big Data", "Cloud Computing"] {
            assert!(res.skill_gap.contains(skill), "missing {skill}");
        }
        assert!(!res.skill_gap.contains("SQL"));
    }

    #[test]
    fn test_goal_required_only_matches_example_when_preferred_held() {
        let profile = analyst(
            &[
                "SQL",
                "Excel",
                "Data Visualization",
                "Deep Learning",
                "Big Data",
                "Cloud Computing",
            ],
            &["Data Scientist"],
        );
        let res = resolve(&profile, &LearningPreferences::default());
        assert_eq!(res.skill_gap, set(&["Statistics", "Python", "Machine Learning"]));
    }

    #[test]
    fn test_current_role_preferred_skills_not_required() {
        let profile = analyst(&["SQL", "Excel", "Data Visualization", "Statistics"], &[]);
        let res = resolve(&profile, &LearningPreferences::default());
        assert!(res.skill_gap.is_empty());
        assert!(res.candidate_courses.is_empty());
    }

    #[test]
    fn test_unknown_role_and_goal_are_silently_ignored() {
        let mut profile = analyst(&["Excel"], &["Astronaut"]);
        profile.current_role = "Business Analyst".to_string();
        let res = resolve(&profile, &LearningPreferences::default());
        assert!(res.skill_gap.is_empty());
    }

    #[test]
    fn test_requested_and_mentioned_skills_join_gap_unless_held() {
        let profile = analyst(&["SQL", "Excel", "Data Visualization", "Statistics"], &[]);
        let prefs = LearningPreferences {
            specific_skills_requested: vec!["Tableau".to_string(), "SQL".to_string()],
            ..Default::default()
        };
        let extracted = ExtractedRequirement {
            intents: BTreeSet::new(),
            time_available_weeks: 0,
            mentioned_skills: vec!["AWS".to_string(), "Excel".to_string()],
            urgency: Urgency::Medium,
        };
        let gap = compute_skill_gap(&profile, &prefs, Some(&extracted), &RoleTable::builtin());
        assert_eq!(gap, set(&["AWS", "Tableau"]));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let profile = analyst(&["SQL"], &["AI Specialist", "Data Science Manager"]);
        let prefs = LearningPreferences::default();
        assert_eq!(resolve(&profile, &prefs), resolve(&profile, &prefs));
    }

    #[test]
    fn test_adding_skill_never_grows_gap() {
        let prefs = LearningPreferences {
            specific_skills_requested: vec!["Tableau".to_string()],
            ..Default::default()
        };
        let before = analyst(&["SQL"], &["Data Scientist"]);
        let base_gap = resolve(&before, &prefs).skill_gap;

        for skill in ["Python", "Tableau", "Excel", "Unrelated"] {
            let mut after = before.clone();
            after.skills.insert(skill.to_string());
            let gap = resolve(&after, &prefs).skill_gap;
            assert!(gap.is_subset(&base_gap), "adding {skill} grew the gap");
        }
    }

    #[test]
    fn test_completed_courses_are_excluded() {
        let mut profile = analyst(&["SQL", "Excel", "Data Visualization"], &[]);
        let all = resolve(&profile, &LearningPreferences::default());
        assert!(all
            .candidate_courses
            .iter()
            .any(|c| c.title == "Statistics for Data Science"));

        profile
            .completed_courses
            .insert("Statistics for Data Science".to_string());
        let res = resolve(&profile, &LearningPreferences::default());
        assert!(res
            .candidate_courses
            .iter()
            .all(|c| c.title != "Statistics for Data Science"));
    }

    #[test]
    fn test_candidates_keep_catalog_order() {
        let profile = analyst(&["SQL", "Excel", "Data Visualization"], &[]);
        let res = resolve(&profile, &LearningPreferences::default());
        let titles: Vec<&str> = res.candidate_courses.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Machine Learning Fundamentals",
                "Statistics for Data Science",
                "Quick Data Analysis Bootcamp",
                "Data Analysis Fundamentals",
            ]
        );
    }

    #[test]
    fn test_time_window_disabled_by_default() {
        let profile = analyst(&["SQL", "Excel", "Data Visualization"], &["AI Specialist"]);
        let prefs = LearningPreferences {
            time_available_weeks: 2,
            ..Default::default()
        };
        let res = resolve(&profile, &prefs);
        assert!(res
            .candidate_courses
            .iter()
            .any(|c| c.title == "Deep Learning Specialization"));
    }

    #[test]
    fn test_time_window_filters_when_enabled() {
        let profile = analyst(&["SQL", "Excel", "Data Visualization"], &["AI Specialist"]);
        let prefs = LearningPreferences {
            time_available_weeks: 3,
            ..Default::default()
        };
        let options = ResolverOptions {
            time_window: Some(TimeWindow::default()),
        };
        let res = resolve_skill_gaps(
            &profile,
            &prefs,
            None,
            &RoleTable::builtin(),
            &CourseCatalog::builtin(),
            &options,
        );
        assert!(!res.candidate_courses.is_empty());
        for course in &res.candidate_courses {
            assert!(
                (1.0..=4.0).contains(&course.duration_weeks),
                "{} ({} weeks) outside window",
                course.title,
                course.duration_weeks
            );
        }
    }

    #[test]
    fn test_time_window_ignored_when_budget_unspecified() {
        let window = TimeWindow::default();
        let catalog = CourseCatalog::builtin();
        let gap = set(&["Deep Learning"]);
        let options = ResolverOptions {
            time_window: Some(window),
        };
        let courses = filter_courses(&catalog, &gap, &BTreeSet::new(), 0, &options);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Deep Learning Specialization");
    }

    #[test]
    fn test_time_window_floor_excludes_short_workshops() {
        let window = TimeWindow::default();
        assert!(!window.admits(0.5, 2));
        assert!(window.admits(1.0, 2));
        assert!(window.admits(3.0, 2));
        assert!(!window.admits(4.0, 2));
    }

    #[test]
    fn test_extracted_time_overrides_preference_budget() {
        let prefs = LearningPreferences::default();
        let extracted = ExtractedRequirement {
            intents: BTreeSet::new(),
            time_available_weeks: 3,
            mentioned_skills: vec![],
            urgency: Urgency::Medium,
        };
        assert_eq!(effective_time_weeks(&prefs, Some(&extracted)), 3);
        assert_eq!(effective_time_weeks(&prefs, None), 8);
    }
}
