//! Five-strategy conference title matcher.

use venuerank_text::{MatchTrace, clean_title, extract_acronym, normalize, significant_tokens};

use crate::{ConferenceEntry, ConferenceTable};

/// Minimum normalized length for the substring strategies. Suppresses
/// accidental short-substring collisions.
const SUBSTRING_MIN_LEN: usize = 20;

/// Word-overlap acceptance thresholds (inclusive).
const OVERLAP_MIN_KEY_TOKENS: usize = 4;
const OVERLAP_KEY_RATIO: f64 = 0.80;

/// Acronyms shorter than this are too ambiguous to resolve on their own.
const ACRONYM_MIN_LEN: usize = 4;

fn note(trace: &mut Option<&mut MatchTrace>, msg: impl Into<String>) {
    if let Some(t) = trace.as_deref_mut() {
        t.push(msg);
    }
}

/// Resolve a free-text conference title against the table.
///
/// Strategies, tried strictly in order, first success wins: exact
/// normalized equality; long table key contained in the input; long input
/// contained in a table key; word overlap over significant tokens; and an
/// acronym tiebreak that only accepts a unique table acronym. Scans walk
/// the table in load order, so the first satisfying entry wins whenever
/// several would qualify.
pub fn match_conference<'t>(
    title: &str,
    table: &'t ConferenceTable,
    mut trace: Option<&mut MatchTrace>,
) -> Option<&'t ConferenceEntry> {
    let input_norm = normalize(&clean_title(title));

    // Strategy 1: exact normalized equality
    if let Some(entry) = table.lookup_norm(&input_norm) {
        note(
            &mut trace,
            format!(
                "conference exact: '{}' == '{}' -> {}",
                input_norm, entry.norm, entry.rank
            ),
        );
        return Some(entry);
    }
    note(
        &mut trace,
        format!("conference exact: no table title equals '{}'", input_norm),
    );

    // Strategy 2: long table key contained in the input
    for entry in table.entries() {
        if entry.norm.chars().count() > SUBSTRING_MIN_LEN && input_norm.contains(&entry.norm) {
            note(
                &mut trace,
                format!(
                    "conference substring: '{}' inside '{}' -> {}",
                    entry.norm, input_norm, entry.rank
                ),
            );
            return Some(entry);
        }
    }
    note(
        &mut trace,
        format!(
            "conference substring: no table title (> {} chars) inside '{}'",
            SUBSTRING_MIN_LEN, input_norm
        ),
    );

    // Strategy 3: long input contained in a table key
    if input_norm.chars().count() > SUBSTRING_MIN_LEN {
        for entry in table.entries() {
            if entry.norm.contains(&input_norm) {
                note(
                    &mut trace,
                    format!(
                        "conference reverse substring: '{}' inside '{}' -> {}",
                        input_norm, entry.norm, entry.rank
                    ),
                );
                return Some(entry);
            }
        }
        note(
            &mut trace,
            format!(
                "conference reverse substring: '{}' not inside any table title",
                input_norm
            ),
        );
    } else {
        note(
            &mut trace,
            format!(
                "conference reverse substring: skipped, input '{}' too short (<= {} chars)",
                input_norm, SUBSTRING_MIN_LEN
            ),
        );
    }

    // Strategy 4: word overlap
    let input_tokens = significant_tokens(&input_norm);
    if !input_tokens.is_empty() {
        for entry in table.entries() {
            let key_count = entry.tokens.len();
            if key_count < OVERLAP_MIN_KEY_TOKENS {
                continue;
            }
            let matched = entry
                .tokens
                .iter()
                .filter(|t| input_tokens.contains(t.as_str()))
                .count();
            let ratio = matched as f64 / key_count as f64;
            if matched >= OVERLAP_MIN_KEY_TOKENS && ratio >= OVERLAP_KEY_RATIO {
                note(
                    &mut trace,
                    format!(
                        "conference overlap: '{}' vs '{}', {}/{} key tokens ({:.2}) -> {}",
                        input_norm, entry.norm, matched, key_count, ratio, entry.rank
                    ),
                );
                return Some(entry);
            }
        }
    }
    note(
        &mut trace,
        format!(
            "conference overlap: no title reached {}/{:.2} for '{}'",
            OVERLAP_MIN_KEY_TOKENS, OVERLAP_KEY_RATIO, input_norm
        ),
    );

    // Strategy 5: acronym tiebreak, unique match only
    match extract_acronym(title) {
        Some(acronym) if acronym.chars().count() >= ACRONYM_MIN_LEN => {
            let candidates: Vec<&ConferenceEntry> = table
                .entries()
                .iter()
                .filter(|e| e.acronym.as_deref() == Some(acronym))
                .collect();
            match candidates.as_slice() {
                [entry] => {
                    note(
                        &mut trace,
                        format!(
                            "conference acronym: '{}' uniquely names '{}' -> {}",
                            acronym, entry.title, entry.rank
                        ),
                    );
                    Some(*entry)
                }
                [] => {
                    note(
                        &mut trace,
                        format!("conference acronym: no table entry stores '{}'", acronym),
                    );
                    None
                }
                multiple => {
                    // Unresolved ambiguity: list every candidate, match nothing.
                    for entry in multiple {
                        note(
                            &mut trace,
                            format!(
                                "conference acronym: '{}' is ambiguous, candidate '{}' ({})",
                                acronym, entry.title, entry.rank
                            ),
                        );
                    }
                    None
                }
            }
        }
        Some(acronym) => {
            note(
                &mut trace,
                format!(
                    "conference acronym: '{}' too short (< {} chars) to resolve alone",
                    acronym, ACRONYM_MIN_LEN
                ),
            );
            None
        }
        None => {
            note(&mut trace, "conference acronym: none found in title");
            None
        }
    }
}
