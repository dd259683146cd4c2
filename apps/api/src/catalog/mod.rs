// Static reference data: roles, courses, and the skill vocabulary derived from them.
// Nothing here is mutated after startup.

pub mod courses;
pub mod roles;

use std::collections::BTreeSet;

use serde::Serialize;

pub use courses::{CourseCatalog, CourseRecord};
pub use roles::RoleTable;

/// Every known skill name, deduplicated case-sensitively and kept sorted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkillVocabulary {
    skills: BTreeSet<String>,
}

impl SkillVocabulary {
    pub fn from_tables(roles: &RoleTable, catalog: &CourseCatalog) -> Self {
        let mut skills = BTreeSet::new();
        for role in roles.iter() {
            skills.extend(role.required_skills.iter().cloned());
            skills.extend(role.preferred_skills.iter().cloned());
        }
        for course in catalog.iter() {
            skills.extend(course.skills.iter().cloned());
        }
        Self { skills }
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.skills.iter()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Skills no role or course knows about, in input order. These never match a gap
    /// or a catalog course, so they are worth flagging back to whoever entered them.
    pub fn unknown<'a>(&self, skills: impl IntoIterator<Item = &'a String>) -> Vec<String> {
        skills
            .into_iter()
            .filter(|skill| !self.contains(skill))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_merges_roles_and_courses() {
        let vocab = SkillVocabulary::from_tables(&RoleTable::builtin(), &CourseCatalog::builtin());
        // role-only skill
        assert!(vocab.contains("Mathematics"));
        // course-only skill
        assert!(vocab.contains("Tableau"));
        // shared by both
        assert!(vocab.contains("Python"));
    }

    #[test]
    fn test_vocabulary_is_deduplicated() {
        let vocab = SkillVocabulary::from_tables(&RoleTable::builtin(), &CourseCatalog::builtin());
        let python_count = vocab.iter().filter(|s| s.as_str() == "Python").count();
        assert_eq!(python_count, 1);
    }

    #[test]
    fn test_unknown_skills_are_reported_in_order() {
        let vocab = SkillVocabulary::from_tables(&RoleTable::builtin(), &CourseCatalog::builtin());
        let skills = vec![
            "Python".to_string(),
            "Cobol".to_string(),
            "sql".to_string(),
            "SQL".to_string(),
        ];
        // matching is case-sensitive, like the gap computation
        assert_eq!(vocab.unknown(&skills), vec!["Cobol", "sql"]);
    }

    #[test]
    fn test_empty_tables_give_empty_vocabulary() {
        let vocab = SkillVocabulary::from_tables(&RoleTable::default(), &CourseCatalog::default());
        assert_eq!(vocab.len(), 0);
    }
}
