//! Which comment lines survive into generated lists.
//!
//! Source lists accumulate changelog-style comments (`! May 28, 2025 https://...`)
//! and bare links. Generated lists keep metadata and section markers and drop
//! that noise.

use std::sync::LazyLock;

use regex::Regex;

use crate::classify::is_comment;

static DATE_URL_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^!\s+(january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2},?\s+\d{4}\s+https?://",
    )
    .expect("date comment pattern is valid")
});

static URL_ONLY_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\s*https?://\S+\s*$").expect("url comment pattern is valid"));

const METADATA_KEYS: &[&str] = &[
    "title:",
    "version:",
    "homepage:",
    "expires:",
    "description:",
    "last modified:",
];

const SECTION_MARKERS: &[&str] = &["===", "---", "section", "important", "note:"];

/// `! <Month> <day>[,] <year> http(s)://...`
pub fn is_date_url_comment(rule: &str) -> bool {
    is_comment(rule) && DATE_URL_COMMENT.is_match(rule.trim())
}

/// Decide whether a line should be kept. Non-comments are always kept.
pub fn should_keep_comment(rule: &str) -> bool {
    if !is_comment(rule) {
        return true;
    }
    if is_date_url_comment(rule) {
        return false;
    }

    let lowered = rule.trim().to_lowercase();

    if METADATA_KEYS.iter().any(|key| lowered.contains(key)) {
        return true;
    }
    if SECTION_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return true;
    }
    if lowered == "!" {
        return false;
    }
    if URL_ONLY_COMMENT.is_match(&lowered) {
        return false;
    }

    true
}
