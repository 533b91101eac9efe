//! Markdown link scanner.
//!
//! Roadmap resource lines look like
//! `Resource: [Intro Video](https://youtube.com/watch?v=abc123) - good overview`
//! and may carry any number of links. The scanner returns every
//! `[label](url)` occurrence in left-to-right order and silently skips
//! anything that does not close properly.

use regex::Regex;
use std::sync::LazyLock;

use crate::classify::parse_http_url;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single `[label](url)` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLink {
    /// Link text; may be empty.
    pub label: String,
    /// Raw link target, trimmed.
    pub url: String,
}

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches `[label](url)`. The label may be empty and may hold one level of
/// balanced brackets (`[Rust [2024] Guide]`); the target may hold one level of
/// balanced parentheses (`/wiki/Rust_(programming_language)`) but no whitespace.
static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[((?:[^\[\]]|\[[^\[\]]*\])*)\]\(\s*((?:[^()\s]|\([^()\s]*\))+)\s*\)")
        .expect("markdown link regex")
});

/// Markers that flag a secondary (practice) line as carrying a watchable link.
const ADVERTISED_LINK_MARKERS: [&str; 2] = ["video:", "watch here"];

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Scan free text for markdown links, in order of appearance.
pub fn scan_links(text: &str) -> Vec<ScannedLink> {
    MARKDOWN_LINK_RE
        .captures_iter(text)
        .map(|caps| ScannedLink {
            label: caps[1].trim().to_string(),
            url: caps[2].to_string(),
        })
        .collect()
}

/// Whether a practice line advertises a link worth scanning
/// (`"Video: [Watch Here](...)"` and similar).
pub fn is_advertised_link(text: &str) -> bool {
    let lower = text.to_lowercase();
    ADVERTISED_LINK_MARKERS.iter().any(|m| lower.contains(m))
}

/// Accept a bare URL from the top-level resource bag.
///
/// Returns the trimmed URL when it is an absolute HTTP(S) URL.
pub fn scan_bare_url(text: &str) -> Option<String> {
    let trimmed = text.trim();
    parse_http_url(trimmed).map(|_| trimmed.to_string())
}
