//! Internal course catalog. Ordered; title is the unique key.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseType {
    Course,
    Workshop,
    Intensive,
    Bootcamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// A single internal course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    /// Human-readable label, e.g. "2 days".
    pub duration: String,
    pub duration_weeks: f32,
    pub skills: Vec<String>,
    pub difficulty: Difficulty,
    /// Learning-style tag, e.g. "Hands-on".
    pub learning_style: String,
    pub description: String,
}

impl CourseRecord {
    pub fn covers_any<'a>(&self, mut skills: impl Iterator<Item = &'a String>) -> bool {
        skills.any(|s| self.skills.contains(s))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseCatalog {
    courses: Vec<CourseRecord>,
}

type BuiltinCourse = (
    &'static str,
    &'static str,
    CourseType,
    &'static str,
    f32,
    &'static [&'static str],
    Difficulty,
    &'static str,
    &'static str,
);

const BUILTIN_COURSES: &[BuiltinCourse] = &[
    (
        "COURSE001",
        "Python Programming Essentials",
        CourseType::Course,
        "4 weeks",
        4.0,
        &["Python", "Programming"],
        Difficulty::Beginner,
        "Hands-on",
        "Learn Python programming fundamentals with practical exercises",
    ),
    (
        "COURSE002",
        "Machine Learning Fundamentals",
        CourseType::Course,
        "6 weeks",
        6.0,
        &["Machine Learning", "Python", "Statistics"],
        Difficulty::Intermediate,
        "Mixed",
        "Introduction to machine learning algorithms and applications",
    ),
    (
        "COURSE003",
        "Data Leadership Workshop",
        CourseType::Workshop,
        "2 days",
        0.5,
        &["Leadership", "Management", "Data Strategy"],
        Difficulty::Advanced,
        "Interactive",
        "Leadership skills for data professionals",
    ),
    (
        "COURSE004",
        "Advanced SQL for Data Analysis",
        CourseType::Course,
        "3 weeks",
        3.0,
        &["SQL", "Database", "Data Analysis"],
        Difficulty::Intermediate,
        "Hands-on",
        "Advanced SQL techniques for complex data analysis",
    ),
    (
        "COURSE005",
        "Data Visualization with Tableau",
        CourseType::Course,
        "2 weeks",
        2.0,
        &["Data Visualization", "Tableau"],
        Difficulty::Beginner,
        "Visual",
        "Create impactful data visualizations using Tableau",
    ),
    (
        "COURSE006",
        "Statistics for Data Science",
        CourseType::Course,
        "5 weeks",
        5.0,
        &["Statistics", "Data Science"],
        Difficulty::Intermediate,
        "Mixed",
        "Statistical methods essential for data science",
    ),
    (
        "COURSE007",
        "Deep Learning Specialization",
        CourseType::Course,
        "12 weeks",
        12.0,
        &["Deep Learning", "Neural Networks", "Python"],
        Difficulty::Advanced,
        "Hands-on",
        "Comprehensive deep learning techniques and applications",
    ),
    (
        "COURSE008",
        "Agile Project Management",
        CourseType::Course,
        "3 weeks",
        3.0,
        &["Project Management", "Agile"],
        Difficulty::Beginner,
        "Interactive",
        "Agile methodologies for project management",
    ),
    (
        "COURSE009",
        "Quick Data Analysis Bootcamp",
        CourseType::Intensive,
        "1 week",
        1.0,
        &["Data Analysis", "Statistics"],
        Difficulty::Intermediate,
        "Intensive",
        "Rapid introduction to data analysis techniques",
    ),
    (
        "COURSE010",
        "Python for Data Science - Fast Track",
        CourseType::Bootcamp,
        "2 weeks",
        2.0,
        &["Python", "Data Science"],
        Difficulty::Intermediate,
        "Intensive",
        "Accelerated Python course for data science applications",
    ),
    (
        "COURSE011",
        "Business Intelligence Essentials",
        CourseType::Course,
        "4 weeks",
        4.0,
        &["Business Intelligence", "Data Analysis"],
        Difficulty::Beginner,
        "Mixed",
        "Introduction to BI tools and methodologies",
    ),
    (
        "COURSE012",
        "Cloud Computing Fundamentals",
        CourseType::Course,
        "3 weeks",
        3.0,
        &["Cloud Computing", "AWS"],
        Difficulty::Beginner,
        "Hands-on",
        "Learn cloud computing basics with AWS",
    ),
    (
        "COURSE013",
        "Data Analysis Fundamentals",
        CourseType::Course,
        "3 weeks",
        3.0,
        &["Data Analysis", "Statistics"],
        Difficulty::Beginner,
        "Hands-on",
        "Learn Data Analysis basics",
    ),
    (
        "COURSE014",
        "Excel Advanced",
        CourseType::Course,
        "3 weeks",
        3.0,
        &["Data Analysis", "Excel"],
        Difficulty::Intermediate,
        "Hands-on",
        "Learn Excel",
    ),
];

impl CourseCatalog {
    pub fn new(courses: Vec<CourseRecord>) -> Self {
        Self { courses }
    }

    pub fn builtin() -> Self {
        let courses = BUILTIN_COURSES
            .iter()
            .map(
                |&(id, title, course_type, duration, weeks, skills, difficulty, style, description)| {
                    CourseRecord {
                        id: id.to_string(),
                        title: title.to_string(),
                        course_type,
                        duration: duration.to_string(),
                        duration_weeks: weeks,
                        skills: skills.iter().map(|s| s.to_string()).collect(),
                        difficulty,
                        learning_style: style.to_string(),
                        description: description.to_string(),
                    }
                },
            )
            .collect();
        Self::new(courses)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseRecord> {
        self.courses.iter()
    }

    pub fn get(&self, title: &str) -> Option<&CourseRecord> {
        self.courses.iter().find(|c| c.title == title)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }
}
