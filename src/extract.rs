// src/extract.rs

//! Mention extraction from free text.
//!
//! Three textual conventions are recognized:
//! - `{Title by Author}`, the common curly-brace convention
//! - `[Title by Author]`, the historical square-bracket convention
//! - the contributor first line: `[Title](link) by [Author](link)` or a
//!   bare `Title by Author` phrase on the first line of a recognized
//!   contributor comment
//!
//! All matching is case-insensitive and never fails: malformed or absent
//! patterns simply yield no results.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Convention, Mention};

static CURLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{([^{}]+?)\s+by\s+([^{}]+?)\}").expect("valid regex")
});

static SQUARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[([^\[\]]+?)\s+by\s+([^\[\]]+?)\]").expect("valid regex")
});

static MARKDOWN_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\[([^\]]+)\]\(([^)]+)\)\s+by\s+\[([^\]]+)\]\([^)]+\)")
        .expect("valid regex")
});

static BARE_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)\s+by\s+(.+)$").expect("valid regex"));

static CATALOG_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://www\.romance\.io/[\w\-/?=&#.]+").expect("valid regex")
});

static TOPICS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Topics?:\s*([^\n]+)").expect("valid regex"));

static STEAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Steam:\s*([^\n]+)").expect("valid regex"));

/// Extract every bracketed `Title by Author` mention, in order of
/// appearance.
///
/// Matching is non-greedy up to the nearest closing delimiter, so nested
/// or malformed brace pairs yield no match for that span.
pub fn bracketed_mentions(text: &str, convention: Convention) -> Vec<Mention> {
    let re = match convention {
        Convention::Curly => &*CURLY_RE,
        Convention::Square => &*SQUARE_RE,
    };
    re.captures_iter(text)
        .map(|cap| Mention::new(&cap[1], &cap[2]))
        .collect()
}

/// Extract a mention from the first line of contributor content.
///
/// Tries the markdown link pair first (capturing the book link as a
/// direct catalog URL), then a bare `Title by Author` phrase. Only the
/// first line is considered; a mention anywhere else is not found.
pub fn first_line_mention(text: &str) -> Vec<Mention> {
    let Some(first_line) = text.trim().lines().next().map(str::trim) else {
        return Vec::new();
    };
    if first_line.is_empty() {
        return Vec::new();
    }
    if let Some(cap) = MARKDOWN_PAIR_RE.captures(first_line) {
        return vec![Mention::with_catalog_url(&cap[1], &cap[3], &cap[2])];
    }
    if let Some(cap) = BARE_PAIR_RE.captures(first_line) {
        return vec![Mention::new(&cap[1], &cap[2])];
    }
    Vec::new()
}

/// First community-catalog URL appearing verbatim in the text.
///
/// An author-supplied link is more authoritative than a fuzzy search
/// match, so callers let it override any resolved catalog URL.
pub fn catalog_link(text: &str) -> Option<String> {
    CATALOG_LINK_RE.find(text).map(|m| m.as_str().to_string())
}

/// `Topics:` tag list and `Steam:` label from a contributor comment body.
pub fn contributor_data(text: &str) -> (Vec<String>, String) {
    let topics = TOPICS_RE
        .captures(text)
        .map(|cap| {
            cap[1]
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let steam = STEAM_RE
        .captures(text)
        .map(|cap| cap[1].trim().to_string())
        .unwrap_or_default();
    (topics, steam)
}
