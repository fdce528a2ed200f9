//! Ordered registry of package sources; registration order is lookup order.

use std::sync::Arc;

use crate::{PackageSource, SourceSummary};

/// In-memory, ordered registry of package sources.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn PackageSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source; it is consulted after every source registered before it.
    ///
    /// A source whose id is already registered replaces the earlier one in place.
    pub fn register<S>(&mut self, source: S)
    where
        S: PackageSource + 'static,
    {
        self.register_arc(Arc::new(source));
    }

    /// Append an already shared source.
    pub fn register_arc(&mut self, source: Arc<dyn PackageSource>) {
        if let Some(slot) = self
            .sources
            .iter_mut()
            .find(|existing| existing.id() == source.id())
        {
            *slot = source;
        } else {
            self.sources.push(source);
        }
    }

    /// Retrieve a source by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn PackageSource>> {
        self.sources
            .iter()
            .find(|source| source.id() == id)
            .cloned()
    }

    /// Sources in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn PackageSource>> + '_ {
        self.sources.iter()
    }

    /// Registered identifiers in lookup order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sources.iter().map(|source| source.id())
    }

    /// Summaries for all registered sources.
    #[must_use]
    pub fn summaries(&self) -> Vec<SourceSummary> {
        self.sources
            .iter()
            .enumerate()
            .map(|(priority, source)| SourceSummary {
                id: source.id().to_string(),
                label: source.label().to_string(),
                priority,
            })
            .collect()
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when no source is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.ids().collect();
        f.debug_struct("SourceRegistry")
            .field("sources", &ids)
            .finish()
    }
}
