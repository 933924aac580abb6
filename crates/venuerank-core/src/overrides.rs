//! User override store: normalized title -> user-chosen rank string.
//!
//! The in-memory map is the source of truth for a session. Every mutation
//! rewrites the complete map through the persistence collaborator as one
//! opaque snapshot value (write-through, not read-through after the initial
//! load). Keys are lowercased and trimmed only; punctuation is preserved,
//! unlike the full matching normalization.

use std::collections::BTreeMap;

use crate::CoreError;

/// Persistence collaborator: get/set of exactly one opaque string value.
///
/// The store owns the (de)serialization of that value; backends treat it
/// as a blob. [`MemoryBackend`] keeps it in memory for tests and
/// session-only use; [`crate::SqliteBackend`] persists it.
pub trait OverrideBackend: Send {
    fn load(&mut self) -> Result<Option<String>, CoreError>;
    fn save(&mut self, snapshot: &str) -> Result<(), CoreError>;
}

/// In-memory backend: overrides last for the session only.
#[derive(Default)]
pub struct MemoryBackend {
    value: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a pre-existing snapshot value (tests).
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl OverrideBackend for MemoryBackend {
    fn load(&mut self) -> Result<Option<String>, CoreError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, snapshot: &str) -> Result<(), CoreError> {
        self.value = Some(snapshot.to_string());
        Ok(())
    }
}

/// Override key normalization: lowercase + trim, nothing else.
fn override_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// The mutable override map plus its persistence backend.
pub struct OverrideStore {
    map: BTreeMap<String, String>,
    backend: Box<dyn OverrideBackend>,
}

impl OverrideStore {
    /// Load the persisted snapshot through the backend.
    ///
    /// A backend read failure or an unparseable snapshot must not crash
    /// startup: the store resets to empty and best-effort overwrites the
    /// bad value so the failure does not repeat on the next load.
    pub fn load(mut backend: Box<dyn OverrideBackend>) -> Self {
        let map = match backend.load() {
            Ok(Some(snapshot)) => match serde_json::from_str::<BTreeMap<String, String>>(&snapshot)
            {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(error = %e, "corrupted override snapshot, resetting to empty");
                    if let Err(e) = backend.save("{}") {
                        tracing::warn!(error = %e, "failed to overwrite corrupted snapshot");
                    }
                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load override snapshot, starting empty");
                BTreeMap::new()
            }
        };
        Self { map, backend }
    }

    /// Session-only store with no persisted state.
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryBackend::new()))
    }

    /// Set (or replace) the override for a title, then persist.
    pub fn set(&mut self, title: &str, rank: &str) -> Result<(), CoreError> {
        self.map.insert(override_key(title), rank.to_string());
        self.persist()
    }

    /// Remove the override for a title, then persist. Returns whether an
    /// override was present.
    pub fn remove(&mut self, title: &str) -> Result<bool, CoreError> {
        let removed = self.map.remove(&override_key(title)).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.map.get(&override_key(title)).map(String::as_str)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.map.contains_key(&override_key(title))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Remove every override, then persist the empty snapshot.
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.map.clear();
        self.persist()
    }

    /// All overrides as (normalized title, rank) pairs, sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Write the whole map back as one snapshot value.
    fn persist(&mut self) -> Result<(), CoreError> {
        let snapshot = serde_json::to_string(&self.map)?;
        self.backend.save(&snapshot)
    }
}
