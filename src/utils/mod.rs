//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;
pub mod retry;

use regex::Regex;
use std::sync::OnceLock;

/// Turn free text into a short filesystem-safe slug
pub fn slugify(text: &str, max_len: usize) -> String {
    static INVALID_CHARS: OnceLock<Regex> = OnceLock::new();

    let re =
        INVALID_CHARS.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex pattern"));

    let lowered = text.to_lowercase();
    let slug = re.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    let truncated: String = slug.chars().take(max_len).collect();
    let truncated = truncated.trim_end_matches('-');

    if truncated.is_empty() {
        String::from("query")
    } else {
        truncated.to_string()
    }
}

/// Strip any query-string suffix from a link
pub fn strip_query_string(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}
