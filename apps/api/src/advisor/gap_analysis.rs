//! Role gap analysis. Splits the current role's requirements into critical gaps,
//! recommended extras, and existing strengths.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::RoleTable;
use crate::models::profile::Profile;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapAnalysis {
    pub role: String,
    /// False when the role is not in the requirement table; all sets are then empty.
    pub role_known: bool,
    pub critical_gaps: BTreeSet<String>,
    pub recommended_gaps: BTreeSet<String>,
    pub strengths: BTreeSet<String>,
}

pub fn analyze_role_gaps(profile: &Profile, roles: &RoleTable) -> GapAnalysis {
    let Some(reqs) = roles.get(&profile.current_role) else {
        return GapAnalysis {
            role: profile.current_role.clone(),
            role_known: false,
            critical_gaps: BTreeSet::new(),
            recommended_gaps: BTreeSet::new(),
            strengths: BTreeSet::new(),
        };
    };

    let missing = |skills: &[String]| -> BTreeSet<String> {
        skills
            .iter()
            .filter(|s| !profile.skills.contains(*s))
            .cloned()
            .collect()
    };

    GapAnalysis {
        role: profile.current_role.clone(),
        role_known: true,
        critical_gaps: missing(&reqs.required_skills),
        recommended_gaps: missing(&reqs.preferred_skills),
        strengths: reqs
            .required_skills
            .iter()
            .chain(reqs.preferred_skills.iter())
            .filter(|s| profile.skills.contains(*s))
            .cloned()
            .collect(),
    }
}

fn join_or(set: &BTreeSet<String>, empty: &str) -> String {
    if set.is_empty() {
        empty.to_string()
    } else {
        set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl GapAnalysis {
    /// Chat-ready summary of the analysis.
    pub fn summary(&self) -> String {
        if !self.role_known {
            return format!(
                "No requirement profile is defined for {}. \
                Set a known current role or career goal to get a gap analysis.",
                self.role
            );
        }
        format!(
            "Skill gap analysis for {}:\n\n\
            Critical skills missing: {}\n\n\
            Recommended additional skills: {}\n\n\
            Your strengths: {}\n\n\
            Would you like a learning path to address these gaps, or resources for a specific skill?",
            self.role,
            join_or(&self.critical_gaps, "None - you have all required skills!"),
            join_or(&self.recommended_gaps, "You have excellent coverage!"),
            join_or(&self.strengths, "None yet"),
        )
    }
}
