//! Canonicalization of free-text venue titles.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static TELECOM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btelecommunications?\b").unwrap());
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s]").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a venue title into its canonical comparable form.
///
/// Steps (order matters):
/// 1. Lowercase
/// 2. Replace literal `&` with `and`
/// 3. Collapse `telecommunication(s)` into `communications` (word-boundary
///    only, so substrings inside larger words are left alone)
/// 4. Replace every character that is not a letter, digit, or whitespace
///    with a single space
/// 5. Collapse whitespace runs and trim
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)` for all inputs.
pub fn normalize(title: &str) -> String {
    let lowered = title.to_lowercase().replace('&', "and");
    let collapsed = TELECOM_RE.replace_all(&lowered, "communications");
    let spaced = NON_WORD_RE.replace_all(&collapsed, " ");
    WS_RE.replace_all(&spaced, " ").trim().to_string()
}

static PROCEEDINGS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^proceedings of the\s+").unwrap());
static CODE_YEAR_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9]*\s+\d{4}\s+-\s+").unwrap());
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").unwrap());
static ORDINAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\d+(?:st|nd|rd|th)\s*(?:annual\s+)?").unwrap());
static ANNUAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bannual\b").unwrap());
static TRAILING_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\s*[A-Z][A-Z0-9]*\s+['\u{2019}]?\d{2,4}\s*$").unwrap());

fn squash(s: &str) -> String {
    WS_RE.replace_all(s, " ").trim().to_string()
}

/// Strip structural boilerplate from a venue title before normalization.
///
/// Removes, in order: a leading "Proceedings of the "; a leading
/// `CODE YYYY - ` conference-code prefix; every standalone 4-digit year;
/// ordinal prefixes like `25th Annual `; the standalone word `Annual`;
/// a trailing `- CODE 'YY` suffix. Whitespace is re-collapsed after each
/// removal.
///
/// This is lossy on purpose: it trades occasional over-stripping for
/// resilience against real-world venue-name boilerplate.
pub fn clean_title(title: &str) -> String {
    let mut cleaned = squash(title);
    for re in [
        &*PROCEEDINGS_RE,
        &*CODE_YEAR_PREFIX_RE,
        &*YEAR_RE,
        &*ORDINAL_RE,
        &*ANNUAL_RE,
        &*TRAILING_CODE_RE,
    ] {
        cleaned = squash(&re.replace_all(&cleaned, ""));
    }
    cleaned
}

static ACRONYM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([A-Z][A-Z0-9&]+)\)").unwrap());

/// Extract a parenthesized all-caps short code from a title, if present.
///
/// Returns the contents of the first parenthesized run starting with an
/// uppercase letter followed by uppercase letters, digits, or `&`, of
/// length >= 2. Later parenthesized runs are never considered.
pub fn extract_acronym(title: &str) -> Option<&str> {
    ACRONYM_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split a normalized title into its significant tokens (length > 3).
///
/// Duplicate tokens collapse to one set entry, so overlap counting is set
/// membership rather than occurrence counting.
pub fn significant_tokens(normalized: &str) -> HashSet<&str> {
    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() > 3)
        .collect()
}
