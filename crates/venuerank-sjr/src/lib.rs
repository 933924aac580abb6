//! SJR journal quartile reference table and title matcher.
//!
//! Holds the static journal ranking table (title -> quartile + score),
//! loaded once at startup, and the three-strategy matcher that resolves
//! free-text journal titles against it.

mod query;

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use query::match_journal;

#[derive(Error, Debug)]
pub enum SjrError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// SJR quality quartile of a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quartile {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quartile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quartile::Q1 => "Q1",
            Quartile::Q2 => "Q2",
            Quartile::Q3 => "Q3",
            Quartile::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record of the external journal table file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalRecord {
    pub title: String,
    pub quartile: Quartile,
    pub score: f64,
}

/// A loaded journal table row with its precomputed comparison forms.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub title: String,
    pub quartile: Quartile,
    pub score: f64,
    /// Title truncated at its first comma (publisher/series suffixes are
    /// discarded there), then normalized. Used by the fuzzy and overlap
    /// strategies.
    pub(crate) norm_short: String,
    /// Significant (length > 3) tokens of `norm_short`.
    pub(crate) tokens: Vec<String>,
}

/// The static journal ranking table.
///
/// Keeps both an ordered entry list (scan strategies walk it in load order,
/// first satisfying entry wins) and lookup indexes for the equality
/// strategies. Immutable after load.
pub struct JournalTable {
    entries: Vec<JournalEntry>,
    by_title_ci: HashMap<String, usize>,
    by_norm_short: HashMap<String, usize>,
}

impl JournalTable {
    /// Build a table from records, preserving their order.
    ///
    /// Duplicate titles (case-insensitive) are dropped with a warning so
    /// the first record keeps winning every strategy deterministically.
    pub fn from_records(records: impl IntoIterator<Item = JournalRecord>) -> Self {
        let mut entries = Vec::new();
        let mut by_title_ci = HashMap::new();
        let mut by_norm_short = HashMap::new();

        for record in records {
            let key_ci = record.title.to_lowercase();
            if by_title_ci.contains_key(&key_ci) {
                tracing::warn!(title = %record.title, "duplicate journal table entry, keeping first");
                continue;
            }

            let short = record
                .title
                .split(',')
                .next()
                .unwrap_or(record.title.as_str());
            let norm_short = venuerank_text::normalize(short);
            let tokens = venuerank_text::significant_tokens(&norm_short)
                .into_iter()
                .map(str::to_string)
                .collect();

            let idx = entries.len();
            by_title_ci.insert(key_ci, idx);
            by_norm_short.entry(norm_short.clone()).or_insert(idx);
            entries.push(JournalEntry {
                title: record.title,
                quartile: record.quartile,
                score: record.score,
                norm_short,
                tokens,
            });
        }

        Self {
            entries,
            by_title_ci,
            by_norm_short,
        }
    }

    /// Load a table from a JSON array of `{title, quartile, score}` records.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, SjrError> {
        let records: Vec<JournalRecord> = serde_json::from_reader(reader)?;
        Ok(Self::from_records(records))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SjrError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in load order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Case-insensitive exact lookup against the stored titles.
    pub(crate) fn lookup_ci(&self, raw_title: &str) -> Option<&JournalEntry> {
        self.by_title_ci
            .get(&raw_title.to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    /// Lookup by comma-truncated normalized form. First-loaded entry wins
    /// when several share a normalized form.
    pub(crate) fn lookup_norm_short(&self, norm: &str) -> Option<&JournalEntry> {
        self.by_norm_short.get(norm).map(|&idx| &self.entries[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, quartile: Quartile, score: f64) -> JournalRecord {
        JournalRecord {
            title: title.into(),
            quartile,
            score,
        }
    }

    #[test]
    fn test_from_records_preserves_order() {
        let table = JournalTable::from_records([
            record("Journal A", Quartile::Q1, 2.5),
            record("Journal B", Quartile::Q2, 1.5),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].title, "Journal A");
        assert_eq!(table.entries()[1].title, "Journal B");
    }

    #[test]
    fn test_duplicate_titles_first_wins() {
        let table = JournalTable::from_records([
            record("Journal A", Quartile::Q1, 2.5),
            record("JOURNAL A", Quartile::Q4, 0.1),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].quartile, Quartile::Q1);
    }

    #[test]
    fn test_comma_truncation_precomputed() {
        let table = JournalTable::from_records([record(
            "Pattern Recognition, Elsevier Series in Computing",
            Quartile::Q1,
            1.9,
        )]);
        assert_eq!(table.entries()[0].norm_short, "pattern recognition");
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"[
            {"title": "Machine Learning", "quartile": "Q1", "score": 3.1},
            {"title": "Applied Widgets", "quartile": "Q3", "score": 0.4}
        ]"#;
        let table = JournalTable::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].quartile, Quartile::Q1);
        assert_eq!(table.entries()[1].score, 0.4);
    }

    #[test]
    fn test_json_rejects_bad_quartile() {
        let json = r#"[{"title": "X", "quartile": "Q9", "score": 1.0}]"#;
        assert!(JournalTable::from_json_reader(json.as_bytes()).is_err());
    }

    #[test]
    fn test_quartile_display() {
        assert_eq!(Quartile::Q1.to_string(), "Q1");
        assert_eq!(Quartile::Q4.as_str(), "Q4");
    }
}
