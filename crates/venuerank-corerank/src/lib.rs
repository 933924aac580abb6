//! CORE conference ranking reference table and title matcher.
//!
//! Mirrors the `venuerank-sjr` crate's architecture: static load-once table
//! with precomputed comparison forms in `lib.rs`, strategy cascade in
//! `query.rs`. Conference ranks are an open set (`A*`, `A`, `B`, `C`,
//! national tiers), so they stay plain strings rather than an enum.

mod query;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use query::match_conference;

#[derive(Error, Debug)]
pub enum CoreRankError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One record of the external conference table file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConferenceRecord {
    pub title: String,
    pub rank: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
}

/// A loaded conference table row with its precomputed comparison forms.
#[derive(Debug, Clone)]
pub struct ConferenceEntry {
    pub title: String,
    pub rank: String,
    /// Short code of the venue. Not guaranteed unique across entries.
    pub acronym: Option<String>,
    /// Normalized title, used by every scan strategy.
    pub(crate) norm: String,
    /// Significant (length > 3) tokens of `norm`.
    pub(crate) tokens: Vec<String>,
}

/// The static conference ranking table.
///
/// Keeps an ordered entry list (scan strategies walk it in load order,
/// first satisfying entry wins) plus a lookup index for the exact strategy.
/// Immutable after load.
pub struct ConferenceTable {
    entries: Vec<ConferenceEntry>,
    by_norm: HashMap<String, usize>,
}

impl ConferenceTable {
    /// Build a table from records, preserving their order.
    ///
    /// Records whose normalized title collides with an earlier one are
    /// dropped with a warning so the first record keeps winning every
    /// strategy deterministically.
    pub fn from_records(records: impl IntoIterator<Item = ConferenceRecord>) -> Self {
        let mut entries = Vec::new();
        let mut by_norm = HashMap::new();

        for record in records {
            let norm = venuerank_text::normalize(&record.title);
            if by_norm.contains_key(&norm) {
                tracing::warn!(title = %record.title, "duplicate conference table entry, keeping first");
                continue;
            }

            let tokens = venuerank_text::significant_tokens(&norm)
                .into_iter()
                .map(str::to_string)
                .collect();

            by_norm.insert(norm.clone(), entries.len());
            entries.push(ConferenceEntry {
                title: record.title,
                rank: record.rank,
                acronym: record.acronym,
                norm,
                tokens,
            });
        }

        Self { entries, by_norm }
    }

    /// Load a table from a JSON array of `{title, rank, acronym?}` records.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, CoreRankError> {
        let records: Vec<ConferenceRecord> = serde_json::from_reader(reader)?;
        Ok(Self::from_records(records))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CoreRankError> {
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
    pub fn entries(&self) -> &[ConferenceEntry] {
        &self.entries
    }

    /// Exact lookup by normalized title.
    pub(crate) fn lookup_norm(&self, norm: &str) -> Option<&ConferenceEntry> {
        self.by_norm.get(norm).map(|&idx| &self.entries[idx])
    }
}
