//! The two shipped ranking sources: SJR journal quartiles and CORE
//! conference ranks.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use venuerank_corerank::ConferenceTable;
use venuerank_sjr::JournalTable;
use venuerank_text::MatchTrace;

use crate::registry::{RankingSource, SourceDescriptor};

/// Journal quartile source backed by the static SJR table.
///
/// Always enabled in the reference deployment (no external flag).
pub struct JournalSource {
    table: JournalTable,
}

impl JournalSource {
    pub const ID: &'static str = "sjr";

    pub fn new(table: JournalTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &JournalTable {
        &self.table
    }

    /// Wrap the source in its standard descriptor.
    pub fn descriptor(table: JournalTable, priority: i32) -> SourceDescriptor {
        SourceDescriptor {
            id: Self::ID.into(),
            name: "SJR journal quartiles".into(),
            priority,
            enabled: None,
            source: Box::new(Self::new(table)),
        }
    }
}

impl RankingSource for JournalSource {
    fn resolve(&self, title: &str, trace: Option<&mut MatchTrace>) -> Option<String> {
        venuerank_sjr::match_journal(title, &self.table, trace)
            .map(|entry| entry.quartile.as_str().to_string())
    }
}

/// Conference rank source backed by the static CORE table.
pub struct ConferenceSource {
    table: ConferenceTable,
}

impl ConferenceSource {
    pub const ID: &'static str = "core";

    pub fn new(table: ConferenceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ConferenceTable {
        &self.table
    }

    /// Wrap the source in its standard descriptor. The host owns the
    /// enablement flag and can flip it at any time.
    pub fn descriptor(
        table: ConferenceTable,
        priority: i32,
        enabled: Option<Arc<AtomicBool>>,
    ) -> SourceDescriptor {
        SourceDescriptor {
            id: Self::ID.into(),
            name: "CORE conference ranks".into(),
            priority,
            enabled,
            source: Box::new(Self::new(table)),
        }
    }
}

impl RankingSource for ConferenceSource {
    fn resolve(&self, title: &str, trace: Option<&mut MatchTrace>) -> Option<String> {
        venuerank_corerank::match_conference(title, &self.table, trace)
            .map(|entry| entry.rank.clone())
    }
}
