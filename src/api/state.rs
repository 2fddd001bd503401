use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::Watchlist;
use crate::services::{CatalogCache, EmbeddingProvider, MetadataProvider};
use crate::services::similarity::DEFAULT_TOP_K;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    /// Recommendations returned when a request does not ask for a count
    pub recommendation_count: usize,
}

/// Session data replaced on every watchlist upload
#[derive(Default)]
pub struct AppStateInner {
    pub watchlist: Option<Watchlist>,
    pub catalog_cache: CatalogCache,
}

impl AppState {
    /// Creates a state with no watchlist loaded
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner::default())),
            metadata,
            embedder,
            recommendation_count: DEFAULT_TOP_K,
        }
    }

    pub fn with_recommendation_count(mut self, count: usize) -> Self {
        self.recommendation_count = count;
        self
    }
}
