//! Required and preferred skills per role. Ground truth for skill-gap computation.

use serde::{Deserialize, Serialize};

/// Required and preferred skills for a single role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRequirements {
    pub role: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    /// Free-text band, e.g. "Entry to Mid".
    pub experience_band: String,
}

/// Read-only mapping from role name to its requirements, in declaration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleTable {
    roles: Vec<RoleRequirements>,
}

const BUILTIN_ROLES: &[(&str, &[&str], &[&str], &str)] = &[
    (
        "Data Analyst",
        &["SQL", "Data Visualization", "Excel", "Statistics"],
        &["Python", "Database", "Business Intelligence"],
        "Entry to Mid",
    ),
    (
        "Data Scientist",
        &["Python", "Machine Learning", "Statistics", "Data Visualization"],
        &["Deep Learning", "Big Data", "Cloud Computing"],
        "Mid to Senior",
    ),
    (
        "AI Specialist",
        &["Machine Learning", "Deep Learning", "Python", "Mathematics"],
        &["Neural Networks", "Research", "Statistics"],
        "Senior",
    ),
    (
        "Data Science Manager",
        &["Leadership", "Data Science", "Team Management", "Strategy"],
        &["Communication", "Project Management", "Business Intelligence"],
        "Senior to Executive",
    ),
];

impl RoleTable {
    pub fn new(roles: Vec<RoleRequirements>) -> Self {
        Self { roles }
    }

    /// The four roles the advisor ships with.
    pub fn builtin() -> Self {
        let roles = BUILTIN_ROLES
            .iter()
            .map(|(role, required, preferred, band)| RoleRequirements {
                role: role.to_string(),
                required_skills: required.iter().map(|s| s.to_string()).collect(),
                preferred_skills: preferred.iter().map(|s| s.to_string()).collect(),
                experience_band: band.to_string(),
            })
            .collect();
        Self::new(roles)
    }

    /// Exact-name lookup. A miss is not an error; callers fall back silently.
    pub fn get(&self, role: &str) -> Option<&RoleRequirements> {
        self.roles.iter().find(|r| r.role == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleRequirements> {
        self.roles.iter()
    }

    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.role.as_str()).collect()
    }
}
