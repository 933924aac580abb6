//! Resolution engine for publication venue rankings.
//!
//! Wires the static reference tables (`venuerank-sjr`, `venuerank-corerank`)
//! into an ordered registry of ranking sources, layers user overrides on
//! top, and exposes the single [`Resolver`] entry point the host calls per
//! title. All matching is synchronous and pure; the override store is the
//! only mutable state and serializes its persistence cycle internally.

pub mod config_file;
pub mod overrides;
pub mod registry;
pub mod resolver;
pub mod sources;
pub mod store;

use thiserror::Error;

// Re-export for convenience
pub use overrides::{MemoryBackend, OverrideBackend, OverrideStore};
pub use registry::{RankingSource, SourceDescriptor, SourceRegistry};
pub use resolver::Resolver;
pub use sources::{ConferenceSource, JournalSource};
pub use store::SqliteBackend;
pub use venuerank_text::MatchTrace;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A source descriptor with a missing id or name. This is a
    /// programming error in the registering collaborator, not bad data,
    /// so it surfaces as a hard failure at registration time.
    #[error("invalid source registration: {0}")]
    InvalidSource(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
