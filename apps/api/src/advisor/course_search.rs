//! External course lookup: web search and Udemy listing discovery.
//!
//! Failures here never fail a request: callers get an empty result (web search)
//! or template listings (course lookup) and a `warn!` in the log.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::plan::ExternalCourse;

const INSTANT_ANSWER_URL: &str = "https://api.duckduckgo.com/";
const HTML_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Gap skills looked up per learning path.
pub const MAX_SKILLS_PER_LOOKUP: usize = 3;
const COURSES_PER_SKILL: usize = 3;
/// Listings attached to one learning path.
pub const MAX_EXTERNAL_COURSES: usize = 5;
const RESOURCES_PER_QUERY: usize = 3;
const MAX_RESOURCES: usize = 8;
const TITLE_PREVIEW_CHARS: usize = 100;

/// Phrases that introduce a search query, checked in order.
const SEARCH_PHRASES: &[&str] = &[
    "search for",
    "find",
    "look for",
    "research",
    "information about",
];

static COURSE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"href="([^"]*udemy\.com/course/[^"]*)"[^>]*>([^<]+)</a>"#).unwrap()
});

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search endpoint returned status {0}")]
    Status(u16),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningResources {
    pub skill: String,
    pub resources: Vec<SearchHit>,
    pub summary: String,
}

/// Pluggable search backend. Carried in `AppState` as `Arc<dyn CourseSearch>`.
#[async_trait]
pub trait CourseSearch: Send + Sync {
    async fn search_web(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchHit>, SearchError>;

    /// Raw course-listing hits for one skill.
    async fn search_courses(
        &self,
        skill: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError>;
}

// ────────────────────────────────────────────────────────────────────────────
// DuckDuckGo backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
    #[serde(rename = "Abstract", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
}

/// Grouped topics carry neither field and are skipped.
#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
}

pub struct DuckDuckGoSearch {
    client: Client,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    async fn instant_answer(&self, query: &str) -> Result<InstantAnswer, SearchError> {
        let response = self
            .client
            .get(INSTANT_ANSWER_URL)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_redirect", "1"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    async fn listing_page(&self, skill: &str) -> Result<String, SearchError> {
        let query = format!("site:udemy.com {skill} course");
        let response = self
            .client
            .get(HTML_SEARCH_URL)
            .query(&[("q", query.as_str()), ("kl", "us-en")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl CourseSearch for DuckDuckGoSearch {
    async fn search_web(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let answer = self.instant_answer(query).await?;
        Ok(hits_from_instant_answer(&answer, query, max_results))
    }

    async fn search_courses(
        &self,
        skill: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let page = self.listing_page(skill).await;
        if let Some(hits) = scraped_listings(skill, page, max_results) {
            return Ok(hits);
        }
        let answer = self.instant_answer(&format!("udemy {skill} course")).await?;
        Ok(course_hits_from_instant_answer(&answer, max_results))
    }
}

/// Backend used when external lookups are switched off.
pub struct DisabledSearch;

#[async_trait]
impl CourseSearch for DisabledSearch {
    async fn search_web(&self, _query: &str, _max: usize) -> Result<Vec<SearchHit>, SearchError> {
        Ok(Vec::new())
    }

    async fn search_courses(
        &self,
        _skill: &str,
        _max: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        Ok(Vec::new())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response parsing
// ────────────────────────────────────────────────────────────────────────────

fn preview(text: &str) -> String {
    if text.chars().count() > TITLE_PREVIEW_CHARS {
        let cut: String = text.chars().take(TITLE_PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

fn hits_from_instant_answer(answer: &InstantAnswer, query: &str, max: usize) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = answer
        .related_topics
        .iter()
        .take(max)
        .filter_map(|topic| match (&topic.text, &topic.first_url) {
            (Some(text), Some(url)) => Some(SearchHit {
                title: preview(text),
                url: url.clone(),
                snippet: text.clone(),
            }),
            _ => None,
        })
        .collect();

    if hits.is_empty() && !answer.abstract_text.is_empty() {
        hits.push(SearchHit {
            title: format!("About {query}"),
            url: answer.abstract_url.clone(),
            snippet: answer.abstract_text.clone(),
        });
    }
    hits
}

fn course_hits_from_instant_answer(answer: &InstantAnswer, max: usize) -> Vec<SearchHit> {
    answer
        .related_topics
        .iter()
        .filter_map(|topic| {
            let url = topic.first_url.as_ref()?;
            if !url.contains("udemy.com") {
                return None;
            }
            let text = topic.text.clone().unwrap_or_default();
            let title = text.split(" - ").next().unwrap_or_default().to_string();
            Some(SearchHit {
                title,
                url: url.clone(),
                snippet: text,
            })
        })
        .take(max)
        .collect()
}

/// Listings scraped from the HTML result page, or `None` when the page could not
/// be fetched or held no course links and the instant-answer lookup should run.
fn scraped_listings(
    skill: &str,
    page: Result<String, SearchError>,
    max: usize,
) -> Option<Vec<SearchHit>> {
    match page {
        Ok(html) => {
            let hits = scrape_course_links(&html, max);
            if hits.is_empty() {
                debug!("No course links scraped for {skill}; trying instant-answer lookup");
                None
            } else {
                Some(hits)
            }
        }
        Err(e) => {
            warn!("Listing page for {skill} failed: {e}; trying instant-answer lookup");
            None
        }
    }
}

/// Pulls `udemy.com/course/` anchors out of a DuckDuckGo HTML result page.
fn scrape_course_links(html: &str, max: usize) -> Vec<SearchHit> {
    COURSE_LINK
        .captures_iter(html)
        .filter_map(|caps| {
            let raw_url = caps.get(1)?.as_str().replace("&amp;", "&");
            let url = if raw_url.starts_with("http") {
                raw_url
            } else {
                format!("https://{}", raw_url.trim_start_matches('/'))
            };
            let title = caps.get(2)?.as_str().trim().to_string();
            if title.is_empty() || !url.contains("udemy.com/course/") {
                return None;
            }
            Some(SearchHit {
                snippet: format!("Udemy course: {title}"),
                title,
                url,
            })
        })
        .take(max)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Higher-level lookups
// ────────────────────────────────────────────────────────────────────────────

/// Course level inferred from title wording.
pub fn level_from_title(title: &str) -> &'static str {
    let lowered = title.to_lowercase();
    if ["beginner", "basics", "introduction", "getting started"]
        .iter()
        .any(|w| lowered.contains(w))
    {
        "Beginner"
    } else if ["advanced", "expert", "mastery", "professional"]
        .iter()
        .any(|w| lowered.contains(w))
    {
        "Advanced"
    } else {
        "Intermediate"
    }
}

fn course_from_hit(hit: SearchHit, skill: &str) -> Option<ExternalCourse> {
    if !hit.url.contains("udemy.com/course/") {
        return None;
    }
    Some(ExternalCourse {
        level: level_from_title(&hit.title).to_string(),
        description: format!("Udemy course for {skill}: {}", hit.title),
        title: hit.title,
        url: hit.url,
        rating: None,
        price: None,
        duration: None,
    })
}

fn url_slug(skill: &str) -> String {
    let lowered = skill.to_lowercase();
    NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// (title, url slug, description, level); `{skill}` is substituted.
const FALLBACK_TEMPLATES: &[(&str, &str, &str, &str)] = &[
    (
        "Complete {skill} Bootcamp",
        "complete-{skill}-bootcamp-zero-to-mastery",
        "Master {skill} from beginner to advanced level with hands-on projects.",
        "All Levels",
    ),
    (
        "{skill} for Beginners",
        "{skill}-for-beginners-complete-course",
        "Learn {skill} from scratch with step-by-step guidance and practical exercises.",
        "Beginner",
    ),
    (
        "Advanced {skill} Masterclass",
        "advanced-{skill}-masterclass-expert-level",
        "Take your {skill} skills further with advanced techniques and best practices.",
        "Advanced",
    ),
    (
        "{skill} Projects Course",
        "{skill}-projects-practical-hands-on-course",
        "Build real-world {skill} projects and strengthen your portfolio.",
        "Intermediate",
    ),
    (
        "Professional {skill} Development",
        "professional-{skill}-development-course",
        "Professional-grade {skill} training aimed at career advancement.",
        "Intermediate",
    ),
];

/// Template listings used when no real listing could be found. One per skill.
pub fn fallback_courses(skills: &[String]) -> Vec<ExternalCourse> {
    skills
        .iter()
        .take(MAX_EXTERNAL_COURSES)
        .zip(FALLBACK_TEMPLATES.iter().cycle())
        .map(|(skill, (title, slug, description, level))| ExternalCourse {
            title: title.replace("{skill}", skill),
            url: format!(
                "https://www.udemy.com/course/{}/",
                slug.replace("{skill}", &url_slug(skill))
            ),
            description: description.replace("{skill}", skill),
            level: level.to_string(),
            rating: None,
            price: None,
            duration: None,
        })
        .collect()
}

/// External listings for up to three gap skills, capped at five. Falls back to
/// template listings when the backend finds nothing.
pub async fn find_external_courses(
    search: &dyn CourseSearch,
    skills: &[String],
) -> Vec<ExternalCourse> {
    if skills.is_empty() {
        return Vec::new();
    }
    let skills: Vec<String> = skills.iter().take(MAX_SKILLS_PER_LOOKUP).cloned().collect();

    let mut courses = Vec::new();
    for skill in &skills {
        match search.search_courses(skill, COURSES_PER_SKILL).await {
            Ok(hits) => courses.extend(hits.into_iter().filter_map(|h| course_from_hit(h, skill))),
            Err(e) => warn!("Course lookup for {skill} failed: {e}"),
        }
    }

    if courses.is_empty() {
        debug!("No external listings found; using template listings");
        return fallback_courses(&skills);
    }
    courses.truncate(MAX_EXTERNAL_COURSES);
    courses
}

/// Web resources for one skill across three query phrasings, deduplicated by URL.
pub async fn learning_resources(search: &dyn CourseSearch, skill: &str) -> LearningResources {
    let queries = [
        format!("{skill} online course tutorial"),
        format!("learn {skill} programming"),
        format!("{skill} certification training"),
    ];

    let mut seen = HashSet::new();
    let mut resources = Vec::new();
    for query in &queries {
        match search.search_web(query, RESOURCES_PER_QUERY).await {
            Ok(hits) => resources.extend(hits.into_iter().filter(|h| seen.insert(h.url.clone()))),
            Err(e) => warn!("Resource search '{query}' failed: {e}"),
        }
    }

    let summary = format!("Found {} learning resources for {skill}", resources.len());
    resources.truncate(MAX_RESOURCES);
    LearningResources {
        skill: skill.to_string(),
        resources,
        summary,
    }
}

/// Text after the first search trigger phrase, or the whole message when the
/// remainder is empty.
pub fn search_query_from(text: &str) -> String {
    let lowered = text.to_lowercase();
    for phrase in SEARCH_PHRASES {
        if let Some((_, rest)) = lowered.split_once(phrase) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return rest.to_string();
            }
            break;
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::testing::StubSearch;

    fn hit(title: &str, url: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: url.to_string(),
            snippet: title.to_string(),
        }
    }

    #[test]
    fn test_scrape_course_links() {
        let html = r#"
            <a class="result__a" href="//www.udemy.com/course/python-bootcamp/?a=1&amp;b=2">Python Bootcamp</a>
            <a href="https://example.com/other">Not a course</a>
            <a href="https://www.udemy.com/course/sql-mastery/">  SQL Mastery </a>
        "#;
        let hits = scrape_course_links(html, 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://www.udemy.com/course/python-bootcamp/?a=1&b=2");
        assert_eq!(hits[0].title, "Python Bootcamp");
        assert_eq!(hits[1].title, "SQL Mastery");
    }

    #[test]
    fn test_scrape_respects_max() {
        let html = r#"<a href="https://www.udemy.com/course/a/">A</a>
            <a href="https://www.udemy.com/course/b/">B</a>"#;
        assert_eq!(scrape_course_links(html, 1).len(), 1);
    }

    #[test]
    fn test_listing_page_failure_falls_through_to_instant_answer() {
        assert_eq!(scraped_listings("SQL", Err(SearchError::Status(503)), 5), None);
        assert_eq!(
            scraped_listings("SQL", Ok("<html>no results</html>".to_string()), 5),
            None
        );

        let page = r#"<a href="https://www.udemy.com/course/sql/">SQL</a>"#.to_string();
        let hits = scraped_listings("SQL", Ok(page), 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://www.udemy.com/course/sql/");
    }

    #[test]
    fn test_instant_answer_topics_and_abstract_fallback() {
        let json = r#"{
            "RelatedTopics": [
                {"Text": "Python is a language", "FirstURL": "https://duckduckgo.com/Python"},
                {"Name": "Group", "Topics": []}
            ],
            "Abstract": "", "AbstractURL": ""
        }"#;
        let answer: InstantAnswer = serde_json::from_str(json).unwrap();
        let hits = hits_from_instant_answer(&answer, "python", 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://duckduckgo.com/Python");

        let json = r#"{"RelatedTopics": [], "Abstract": "Rust is fast", "AbstractURL": "https://rust-lang.org"}"#;
        let answer: InstantAnswer = serde_json::from_str(json).unwrap();
        let hits = hits_from_instant_answer(&answer, "rust", 5);
        assert_eq!(hits[0].title, "About rust");
        assert_eq!(hits[0].snippet, "Rust is fast");
    }

    #[test]
    fn test_long_titles_are_truncated() {
        let long = "x".repeat(150);
        let title = preview(&long);
        assert_eq!(title.chars().count(), TITLE_PREVIEW_CHARS + 3);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_course_hits_filter_udemy_and_split_title() {
        let json = r#"{"RelatedTopics": [
            {"Text": "SQL Course - Udemy", "FirstURL": "https://www.udemy.com/course/sql/"},
            {"Text": "Other", "FirstURL": "https://example.com"}
        ]}"#;
        let answer: InstantAnswer = serde_json::from_str(json).unwrap();
        let hits = course_hits_from_instant_answer(&answer, 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "SQL Course");
    }

    #[test]
    fn test_level_from_title() {
        assert_eq!(level_from_title("Python Basics"), "Beginner");
        assert_eq!(level_from_title("Expert SQL"), "Advanced");
        assert_eq!(level_from_title("Tableau Dashboards"), "Intermediate");
    }

    #[test]
    fn test_fallback_courses_one_per_skill_with_clean_slugs() {
        let skills = vec!["Machine Learning".to_string(), "C++ / Rust".to_string()];
        let courses = fallback_courses(&skills);
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].title, "Complete Machine Learning Bootcamp");
        assert_eq!(
            courses[0].url,
            "https://www.udemy.com/course/complete-machine-learning-bootcamp-zero-to-mastery/"
        );
        assert_eq!(courses[1].title, "C++ / Rust for Beginners");
        assert!(courses[1].url.contains("/c-rust-for-beginners"));
        assert!(courses.iter().all(|c| c.rating.is_none()));
    }

    #[test]
    fn test_search_query_from() {
        assert_eq!(
            search_query_from("Can you search for Python learning resources"),
            "python learning resources"
        );
        assert_eq!(search_query_from("find SQL tutorials"), "sql tutorials");
        assert_eq!(search_query_from("search for"), "search for");
        assert_eq!(search_query_from("  hello  "), "hello");
    }

    #[tokio::test]
    async fn test_find_external_courses_limits_skills_and_results() {
        let search = StubSearch::new(
            vec![],
            vec![
                hit("Python Basics", "https://www.udemy.com/course/py/"),
                hit("Not udemy", "https://example.com/course/x"),
            ],
            false,
        );
        let skills: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let courses = find_external_courses(&search, &skills).await;
        assert_eq!(search.queries().len(), MAX_SKILLS_PER_LOOKUP);
        assert_eq!(courses.len(), 3);
        assert_eq!(courses[0].level, "Beginner");
    }

    #[tokio::test]
    async fn test_find_external_courses_falls_back_on_failure() {
        let search = StubSearch::new(vec![], vec![], true);
        let courses = find_external_courses(&search, &["Statistics".to_string()]).await;
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Complete Statistics Bootcamp");
    }

    #[tokio::test]
    async fn test_find_external_courses_empty_skills() {
        let search = StubSearch::new(vec![], vec![], false);
        assert!(find_external_courses(&search, &[]).await.is_empty());
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_learning_resources_dedupes_by_url() {
        let search = StubSearch::new(
            vec![hit("Doc", "https://a.example"), hit("Doc 2", "https://b.example")],
            vec![],
            false,
        );
        let resources = learning_resources(&search, "SQL").await;
        assert_eq!(search.queries().len(), 3);
        assert_eq!(resources.resources.len(), 2);
        assert_eq!(resources.skill, "SQL");
    }

    #[tokio::test]
    async fn test_learning_resources_survives_failures() {
        let search = StubSearch::new(vec![], vec![], true);
        let resources = learning_resources(&search, "SQL").await;
        assert!(resources.resources.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_search_returns_nothing() {
        let hits = DisabledSearch.search_web("anything", 5).await.unwrap();
        assert!(hits.is_empty());
    }
}
