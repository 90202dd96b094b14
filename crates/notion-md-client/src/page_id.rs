use std::sync::OnceLock;

use regex::Regex;

fn dashed_uuid() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("static regex")
    })
}

/// Extract the page id from a Notion page URL.
///
/// Notion URLs end in `<title-slug>-<32 hex id>`, optionally followed by a
/// query string or fragment.  A bare id (compact or dashed) is returned
/// unchanged.
///
/// `https://www.notion.so/DONE-E20-AI-23b0cda410a68001b52ad66e1ead92e8?v=123`
/// → `23b0cda410a68001b52ad66e1ead92e8`
pub fn page_id_from_url(input: &str) -> String {
    let last = input.trim().rsplit('/').next().unwrap_or("");
    let last = last.split(['?', '#']).next().unwrap_or("");
    if dashed_uuid().is_match(last) {
        return last.to_string();
    }
    last.rsplit('-').next().unwrap_or("").to_string()
}
