use std::sync::Arc;

use crate::models::Catalog;

/// Memoized catalog for the session's current watchlist
///
/// Keyed by the watchlist content hash. Holds at most one catalog; storing
/// under a new key replaces the previous one wholesale.
#[derive(Debug, Default)]
pub struct CatalogCache {
    entry: Option<(String, Arc<Catalog>)>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached catalog if it was built for `hash`
    pub fn get(&self, hash: &str) -> Option<Arc<Catalog>> {
        match &self.entry {
            Some((key, catalog)) if key == hash => Some(Arc::clone(catalog)),
            _ => None,
        }
    }

    /// Stores `catalog` under `hash`, evicting any other watchlist's catalog
    pub fn insert(&mut self, hash: String, catalog: Catalog) -> Arc<Catalog> {
        let catalog = Arc::new(catalog);
        if let Some((old, _)) = &self.entry {
            if old != &hash {
                tracing::debug!(old = %old, new = %hash, "Replacing cached catalog");
            }
        }
        self.entry = Some((hash, Arc::clone(&catalog)));
        catalog
    }

    /// Drops the cached catalog
    pub fn invalidate(&mut self) {
        if let Some((key, _)) = self.entry.take() {
            tracing::info!(hash = %key, "Catalog cache invalidated");
        }
    }

    /// Hash of the watchlist currently cached
    pub fn key(&self) -> Option<&str> {
        self.entry.as_ref().map(|(key, _)| key.as_str())
    }
}
