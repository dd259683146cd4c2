// Cross-cutting prompt fragments shared by every caller of the LLM client.
// Feature-specific prompts live in a prompts.rs next to the feature.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Keeps course recommendations inside the supplied catalog.
pub const CATALOG_GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Recommend ONLY courses that appear in the AVAILABLE COURSES list, \
    using their exact titles. Do NOT invent courses, providers, or durations. \
    If no listed course addresses a gap, leave that gap out of skill_gaps_addressed.";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Fills `{name}` placeholders in a single pass over the template. Inserted values
/// are never rescanned; placeholders without a value are left as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
