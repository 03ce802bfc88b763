//! Use case suggestion parser.
//!
//! Model output is accepted in two shapes:
//! - A JSON array of `{"title": ..., "description": ...}` objects, optionally
//!   wrapped in a Markdown code fence or surrounded by prose.
//! - A numbered or bulleted list of `Title: description` lines.
//!
//! JSON wins when it parses to at least one entry.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use scout_shared::UseCase;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches `1. Title: description`, `2) Title - description`, `- **Title**: description`.
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+[.)]|[-*])\s+(.+?)\s*(?::|\s-\s)\s*(.+)$").expect("list item regex")
});

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse model output into use cases, preserving the order they were given in.
///
/// Returns an empty vector when nothing recognizable is found.
pub fn parse_use_cases(text: &str) -> Vec<UseCase> {
    let from_json = parse_json_array(text);
    if !from_json.is_empty() {
        return from_json;
    }
    parse_list_lines(text)
}

fn parse_json_array(text: &str) -> Vec<UseCase> {
    let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<RawSuggestion>>(&text[start..=end]) {
        Ok(raw) => raw
            .into_iter()
            .filter_map(|s| {
                let title = s.title.as_deref().unwrap_or_default().trim();
                let description = s.description.as_deref().unwrap_or_default().trim();
                (!title.is_empty()).then(|| UseCase::new(title, description))
            })
            .collect(),
        Err(e) => {
            tracing::debug!(error = %e, "suggestions are not a JSON array, trying list form");
            Vec::new()
        }
    }
}

fn parse_list_lines(text: &str) -> Vec<UseCase> {
    text.lines()
        .filter_map(|line| {
            let caps = LIST_ITEM_RE.captures(line.trim())?;
            let title = caps[1].trim().trim_matches('*').trim();
            let description = caps[2].trim().trim_start_matches('*').trim();
            (!title.is_empty()).then(|| UseCase::new(title, description))
        })
        .collect()
}
