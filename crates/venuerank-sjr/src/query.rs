//! Three-strategy journal title matcher.

use venuerank_text::{MatchTrace, clean_title, normalize, significant_tokens};

use crate::{JournalEntry, JournalTable};

/// Minimum length of the cleaned comparison string for the fuzzy strategy.
/// Guards against empty/near-empty strings colliding after cleanup.
const FUZZY_MIN_LEN: usize = 10;

/// Word-overlap acceptance thresholds (inclusive).
const OVERLAP_MIN_KEY_TOKENS: usize = 5;
const OVERLAP_KEY_RATIO: f64 = 0.85;
const OVERLAP_INPUT_RATIO: f64 = 0.80;

fn note(trace: &mut Option<&mut MatchTrace>, msg: impl Into<String>) {
    if let Some(t) = trace.as_deref_mut() {
        t.push(msg);
    }
}

/// Resolve a free-text journal title against the table.
///
/// Strategies, tried strictly in order, first success wins:
/// 1. exact case-insensitive equality of the raw input with a table title;
/// 2. cleaned+normalized input equal to the comma-truncated normalized
///    table title, only when the cleaned form is long enough to be
///    meaningful;
/// 3. word overlap over significant tokens, with asymmetric thresholds:
///    the input may carry extra boilerplate words, but almost all of the
///    table title's own words must be present.
pub fn match_journal<'t>(
    title: &str,
    table: &'t JournalTable,
    mut trace: Option<&mut MatchTrace>,
) -> Option<&'t JournalEntry> {
    // Strategy 1: exact (case-insensitive, no cleaning)
    if let Some(entry) = table.lookup_ci(title) {
        note(
            &mut trace,
            format!(
                "journal exact: '{}' == '{}' -> {} (score {})",
                title, entry.title, entry.quartile, entry.score
            ),
        );
        return Some(entry);
    }
    note(
        &mut trace,
        format!("journal exact: no table title equals '{}'", title),
    );

    // Strategy 2: cleaned+normalized equality against comma-truncated keys
    let cleaned = normalize(&clean_title(title));
    if cleaned.chars().count() > FUZZY_MIN_LEN {
        if let Some(entry) = table.lookup_norm_short(&cleaned) {
            note(
                &mut trace,
                format!(
                    "journal fuzzy: '{}' == '{}' -> {} (score {})",
                    cleaned, entry.norm_short, entry.quartile, entry.score
                ),
            );
            return Some(entry);
        }
        note(
            &mut trace,
            format!("journal fuzzy: no comma-truncated title equals '{}'", cleaned),
        );
    } else {
        note(
            &mut trace,
            format!(
                "journal fuzzy: skipped, cleaned form '{}' too short (<= {} chars)",
                cleaned, FUZZY_MIN_LEN
            ),
        );
    }

    // Strategy 3: word overlap
    let input_tokens = significant_tokens(&cleaned);
    if input_tokens.is_empty() {
        note(&mut trace, "journal overlap: no significant input tokens");
        return None;
    }

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
        let key_ratio = matched as f64 / key_count as f64;
        let input_ratio = matched as f64 / input_tokens.len() as f64;
        if key_ratio >= OVERLAP_KEY_RATIO && input_ratio >= OVERLAP_INPUT_RATIO {
            note(
                &mut trace,
                format!(
                    "journal overlap: '{}' vs '{}', {}/{} key tokens ({:.2}), {}/{} input tokens ({:.2}) -> {}",
                    cleaned,
                    entry.norm_short,
                    matched,
                    key_count,
                    key_ratio,
                    matched,
                    input_tokens.len(),
                    input_ratio,
                    entry.quartile
                ),
            );
            return Some(entry);
        }
    }
    note(
        &mut trace,
        format!(
            "journal overlap: no title reached {:.2}/{:.2} thresholds for '{}'",
            OVERLAP_KEY_RATIO, OVERLAP_INPUT_RATIO, cleaned
        ),
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JournalRecord, Quartile};

    fn table(records: &[(&str, Quartile, f64)]) -> JournalTable {
        JournalTable::from_records(records.iter().map(|(t, q, s)| JournalRecord {
            title: (*t).into(),
            quartile: *q,
            score: *s,
        }))
    }

    #[test]
    fn test_exact_case_insensitive() {
        let table = table(&[("Pattern Recognition", Quartile::Q1, 2.1)]);
        let entry = match_journal("pattern recognition", &table, None).unwrap();
        assert_eq!(entry.quartile, Quartile::Q1);
    }

    #[test]
    fn test_exact_applies_no_cleaning() {
        // Exact is raw equality: punctuation differences miss at stage 1
        // but the fuzzy stage still resolves them.
        let table = table(&[("Data & Knowledge Engineering", Quartile::Q2, 1.2)]);
        let entry = match_journal("Data and Knowledge Engineering", &table, None).unwrap();
        assert_eq!(entry.quartile, Quartile::Q2);
    }

    #[test]
    fn test_fuzzy_comma_truncated_key() {
        let table = table(&[(
            "Journal of Computational Physics, Academic Press",
            Quartile::Q1,
            2.8,
        )]);
        let entry = match_journal("Journal of Computational Physics", &table, None).unwrap();
        assert_eq!(entry.score, 2.8);
    }

    #[test]
    fn test_fuzzy_strips_boilerplate() {
        let table = table(&[("Advances in Neural Information Processing", Quartile::Q1, 3.0)]);
        let entry = match_journal(
            "Advances in Neural Information Processing 2022",
            &table,
            None,
        )
        .unwrap();
        assert_eq!(entry.quartile, Quartile::Q1);
    }

    #[test]
    fn test_fuzzy_length_guard() {
        // Cleaned form "acm" is far below the length floor: no fuzzy match
        // even though a short key would normalize identically.
        let table = table(&[("ACM", Quartile::Q4, 0.2)]);
        assert!(match_journal("A.C.M.", &table, None).is_none());
    }

    #[test]
    fn test_overlap_requires_five_key_tokens() {
        // Only four significant key tokens: overlap strategy never fires,
        // even with every key token present in the input.
        let table = table(&[("Alpha Beta Gamma Delta", Quartile::Q2, 1.0)]);
        assert!(match_journal("Alpha Beta Gamma Delta Extra", &table, None).is_none());
    }

    #[test]
    fn test_overlap_exact_threshold_matches() {
        // Key: 5 significant tokens; input shares all 5 plus extra words.
        // key ratio 5/5 = 1.00 >= 0.85, input ratio 5/6 = 0.833 >= 0.80.
        let table = table(&[(
            "International Review of Quantitative Finance and Banking",
            Quartile::Q2,
            1.1,
        )]);
        let entry = match_journal(
            "Proceedings of the International Review of Quantitative Finance and Banking Symposium",
            &table,
            None,
        )
        .unwrap();
        assert_eq!(entry.quartile, Quartile::Q2);
    }

    #[test]
    fn test_overlap_below_key_ratio_rejected() {
        // Key has 6 significant tokens, input shares 5: 5/6 = 0.833 < 0.85.
        let table = table(&[(
            "Journal of Statistical Mechanics Theory and Experiment Letters",
            Quartile::Q1,
            2.0,
        )]);
        assert!(
            match_journal(
                "Journal of Statistical Mechanics Theory and Experiment",
                &table,
                None
            )
            .is_none()
        );
    }

    #[test]
    fn test_overlap_below_input_ratio_rejected() {
        // All 5 key tokens match but the input carries too many extra
        // significant tokens: 5/7 = 0.714 < 0.80.
        let table = table(&[(
            "Annals of Probability Statistics Computing Research",
            Quartile::Q1,
            2.2,
        )]);
        assert!(
            match_journal(
                "Annals of Probability Statistics Computing Research Methods Applications",
                &table,
                None
            )
            .is_none()
        );
    }

    #[test]
    fn test_first_table_entry_wins_overlap() {
        let table = table(&[
            ("Alpha Beta Gamma Delta Epsilon Journal", Quartile::Q3, 0.9),
            ("Alpha Beta Gamma Delta Epsilon Review", Quartile::Q1, 2.9),
        ]);
        // Both keys clear the thresholds for this input; load order breaks
        // the tie, so the Q3 entry wins.
        let entry = match_journal("Alpha Beta Gamma Delta Epsilon Journal Review", &table, None)
            .unwrap();
        assert_eq!(entry.quartile, Quartile::Q3);
    }

    #[test]
    fn test_no_match_returns_none() {
        let table = table(&[("Pattern Recognition", Quartile::Q1, 2.1)]);
        assert!(match_journal("Completely Unrelated Venue", &table, None).is_none());
    }

    #[test]
    fn test_empty_input_is_total() {
        let table = table(&[("Pattern Recognition", Quartile::Q1, 2.1)]);
        assert!(match_journal("", &table, None).is_none());
        assert!(match_journal("!!!", &table, None).is_none());
    }

    #[test]
    fn test_trace_records_attempts() {
        let table = table(&[("Pattern Recognition", Quartile::Q1, 2.1)]);
        let mut trace = MatchTrace::new();
        assert!(match_journal("Unrelated Venue Name Here", &table, Some(&mut trace)).is_none());
        // One record per strategy attempt
        assert!(trace.steps().iter().any(|s| s.contains("journal exact")));
        assert!(trace.steps().iter().any(|s| s.contains("journal fuzzy")));
        assert!(trace.steps().iter().any(|s| s.contains("journal overlap")));
    }
}
