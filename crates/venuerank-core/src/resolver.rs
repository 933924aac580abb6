//! Top-level resolution orchestrator.

use std::sync::{Mutex, PoisonError};

use venuerank_text::MatchTrace;

use crate::CoreError;
use crate::overrides::OverrideStore;
use crate::registry::{SourceDescriptor, SourceRegistry};

/// Resolves venue titles by consulting user overrides first, then every
/// enabled ranking source in priority order.
///
/// Matching itself is pure and reentrant; the override store is the only
/// mutable state and sits behind a mutex so its read-modify-write
/// persistence cycle never interleaves.
pub struct Resolver {
    registry: SourceRegistry,
    overrides: Mutex<OverrideStore>,
}

impl Resolver {
    pub fn new(overrides: OverrideStore) -> Self {
        Self {
            registry: SourceRegistry::new(),
            overrides: Mutex::new(overrides),
        }
    }

    /// Session-only resolver with no persisted overrides (tests, dry runs).
    pub fn in_memory() -> Self {
        Self::new(OverrideStore::in_memory())
    }

    pub fn register_source(&mut self, descriptor: SourceDescriptor) -> Result<(), CoreError> {
        self.registry.register(descriptor)
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Resolve a title to a rank string, if any source (or an override)
    /// knows it.
    pub fn resolve(&self, title: &str) -> Option<String> {
        self.resolve_inner(title, None)
    }

    /// Resolve with a strategy trace appended to `trace`.
    pub fn resolve_traced(&self, title: &str, trace: &mut MatchTrace) -> Option<String> {
        self.resolve_inner(title, Some(trace))
    }

    fn resolve_inner(&self, title: &str, mut trace: Option<&mut MatchTrace>) -> Option<String> {
        // Overrides always win, regardless of source priority.
        {
            let overrides = self.lock_overrides();
            if let Some(rank) = overrides.get(title) {
                if let Some(t) = trace.as_deref_mut() {
                    t.push(format!("override: '{}' -> {}", title.trim(), rank));
                }
                return Some(rank.to_string());
            }
        }

        for descriptor in self.registry.enabled_sources() {
            if let Some(t) = trace.as_deref_mut() {
                t.push(format!(
                    "consulting source '{}' (priority {})",
                    descriptor.id, descriptor.priority
                ));
            }
            if let Some(rank) = descriptor.source.resolve(title, trace.as_deref_mut()) {
                return Some(rank);
            }
        }
        None
    }

    pub fn set_override(&self, title: &str, rank: &str) -> Result<(), CoreError> {
        self.lock_overrides().set(title, rank)
    }

    /// Returns whether an override was present and removed.
    pub fn remove_override(&self, title: &str) -> Result<bool, CoreError> {
        self.lock_overrides().remove(title)
    }

    pub fn has_override(&self, title: &str) -> bool {
        self.lock_overrides().contains(title)
    }

    pub fn override_count(&self) -> usize {
        self.lock_overrides().len()
    }

    pub fn clear_overrides(&self) -> Result<(), CoreError> {
        self.lock_overrides().clear()
    }

    /// Snapshot of all overrides as (normalized title, rank) pairs.
    pub fn overrides(&self) -> Vec<(String, String)> {
        self.lock_overrides()
            .entries()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn lock_overrides(&self) -> std::sync::MutexGuard<'_, OverrideStore> {
        self.overrides.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
