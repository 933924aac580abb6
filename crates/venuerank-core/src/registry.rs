//! Ordered, enablement-aware registry of ranking sources.
//!
//! The registry holds dispatch metadata only: which sources exist, whether
//! each is enabled, and in what order they are consulted. Matching logic
//! lives behind the [`RankingSource`] trait, so new ranking tables can be
//! added without touching the orchestrator.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use venuerank_text::MatchTrace;

use crate::CoreError;

/// A ranking source: anything that can resolve a free-text venue title to
/// a rank string.
pub trait RankingSource: Send + Sync {
    fn resolve(&self, title: &str, trace: Option<&mut MatchTrace>) -> Option<String>;
}

/// Registration metadata plus the source itself.
///
/// `enabled` is an external boolean reference owned by the host; `None`
/// means the source is always enabled. Lower `priority` is consulted first.
pub struct SourceDescriptor {
    pub id: String,
    pub name: String,
    pub priority: i32,
    pub enabled: Option<Arc<AtomicBool>>,
    pub source: Box<dyn RankingSource>,
}

impl SourceDescriptor {
    pub fn is_enabled(&self) -> bool {
        self.enabled
            .as_ref()
            .map_or(true, |flag| flag.load(Ordering::Relaxed))
    }
}

/// Ordered collection of registered sources.
#[derive(Default)]
pub struct SourceRegistry {
    descriptors: Vec<SourceDescriptor>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source.
    ///
    /// An empty id or name is rejected outright. Re-registering an existing
    /// id replaces the previous descriptor in place (keeping its position,
    /// so priority ties stay stable) and logs a warning.
    pub fn register(&mut self, descriptor: SourceDescriptor) -> Result<(), CoreError> {
        if descriptor.id.trim().is_empty() {
            return Err(CoreError::InvalidSource("empty source id".into()));
        }
        if descriptor.name.trim().is_empty() {
            return Err(CoreError::InvalidSource(format!(
                "source '{}' has an empty name",
                descriptor.id
            )));
        }

        if let Some(existing) = self
            .descriptors
            .iter_mut()
            .find(|d| d.id == descriptor.id)
        {
            tracing::warn!(id = %descriptor.id, "duplicate source registration, replacing");
            *existing = descriptor;
        } else {
            self.descriptors.push(descriptor);
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SourceDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// Currently enabled sources, sorted by ascending priority.
    ///
    /// The sort is stable: priority ties keep registration order.
    pub fn enabled_sources(&self) -> Vec<&SourceDescriptor> {
        let mut enabled: Vec<&SourceDescriptor> = self
            .descriptors
            .iter()
            .filter(|d| d.is_enabled())
            .collect();
        enabled.sort_by_key(|d| d.priority);
        enabled
    }

    /// All registered sources, in registration order.
    pub fn descriptors(&self) -> &[SourceDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
