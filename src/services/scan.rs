use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, MovieMetadata, SimilarityResult, Watchlist, WatchlistEntry},
    services::{
        embedding::EmbeddingProvider,
        metadata::MetadataProvider,
        similarity::{self, Exclusion},
    },
};

/// A randomly selected movie with its details and similar watchlist titles
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub entry: WatchlistEntry,
    pub metadata: MovieMetadata,
    pub recommendations: Vec<SimilarityResult>,
}

/// Picks one watchlist entry uniformly at random
pub fn pick_entry<R: Rng + ?Sized>(watchlist: &Watchlist, rng: &mut R) -> AppResult<WatchlistEntry> {
    watchlist
        .entries
        .choose(rng)
        .cloned()
        .ok_or_else(|| AppError::InvalidInput("Watchlist contains no entries".to_string()))
}

/// Resolves `entry` and ranks the rest of the catalog against its plot
///
/// The entry's own title is excluded by label. A movie with no plot gets an
/// empty recommendation list rather than an error.
pub async fn scan_entry(
    entry: WatchlistEntry,
    catalog: &Catalog,
    metadata: &dyn MetadataProvider,
    embedder: &dyn EmbeddingProvider,
    k: usize,
) -> AppResult<ScanResult> {
    let movie = metadata
        .fetch(&entry.name, entry.year)
        .await?
        .ok_or_else(|| AppError::MetadataNotFound(entry.to_string()))?;

    let recommendations = match movie.plot_text() {
        Some(plot) => {
            similarity::rank(
                embedder,
                plot,
                &catalog.items,
                k,
                &Exclusion::Label(entry.name.clone()),
            )
            .await?
        }
        None => {
            tracing::info!(entry = %entry, "Selected movie has no plot; no recommendations");
            Vec::new()
        }
    };

    tracing::info!(
        entry = %entry,
        recommendations = recommendations.len(),
        "Scan completed"
    );

    Ok(ScanResult {
        entry,
        metadata: movie,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogItem;
    use crate::services::{embedding::MockEmbeddingProvider, metadata::MockMetadataProvider};
    use rand::{rngs::StdRng, SeedableRng};

    fn movie(title: &str, plot: Option<&str>) -> MovieMetadata {
        MovieMetadata {
            title: title.to_string(),
            year: Some("1995".to_string()),
            poster: None,
            runtime: Some("170 min".to_string()),
            plot: plot.map(str::to_string),
            rating: Some(8.3),
            genres: vec!["Crime".to_string()],
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                CatalogItem {
                    label: "Heat".to_string(),
                    vector: vec![1.0, 0.0],
                },
                CatalogItem {
                    label: "Thief".to_string(),
                    vector: vec![0.9, 0.1],
                },
                CatalogItem {
                    label: "Alien".to_string(),
                    vector: vec![0.0, 1.0],
                },
            ],
            vec![],
        )
    }

    #[test]
    fn test_pick_entry_comes_from_watchlist() {
        let watchlist = Watchlist::new(vec![
            WatchlistEntry::new("Heat", 1995),
            WatchlistEntry::new("Alien", 1979),
        ]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let entry = pick_entry(&watchlist, &mut rng).unwrap();
            assert!(watchlist.entries.contains(&entry));
        }
    }

    #[test]
    fn test_pick_entry_empty_watchlist() {
        let watchlist = Watchlist::new(vec![]);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            pick_entry(&watchlist, &mut rng),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_scan_excludes_selected_title() {
        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect_fetch()
            .returning(|t, _| Ok(Some(movie(t, Some("Career criminals and a cop.")))));

        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_encode()
            .times(1)
            .returning(|_| Ok(vec![vec![0.95, 0.05]]));

        let result = scan_entry(
            WatchlistEntry::new("Heat", 1995),
            &catalog(),
            &metadata,
            &embedder,
            3,
        )
        .await
        .unwrap();

        let labels: Vec<&str> = result
            .recommendations
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Thief", "Alien"]);
        assert_eq!(result.metadata.runtime.as_deref(), Some("170 min"));
    }

    #[tokio::test]
    async fn test_scan_metadata_not_found() {
        let mut metadata = MockMetadataProvider::new();
        metadata.expect_fetch().returning(|_, _| Ok(None));
        let embedder = MockEmbeddingProvider::new();

        let err = scan_entry(
            WatchlistEntry::new("Heat", 1995),
            &catalog(),
            &metadata,
            &embedder,
            3,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::MetadataNotFound(title) if title == "Heat (1995)"));
    }

    #[tokio::test]
    async fn test_scan_without_plot_has_no_recommendations() {
        let mut metadata = MockMetadataProvider::new();
        metadata.expect_fetch().returning(|t, _| Ok(Some(movie(t, None))));
        let mut embedder = MockEmbeddingProvider::new();
        embedder.expect_encode().times(0);

        let result = scan_entry(
            WatchlistEntry::new("Heat", 1995),
            &catalog(),
            &metadata,
            &embedder,
            3,
        )
        .await
        .unwrap();
        assert!(result.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_scan_with_empty_catalog() {
        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect_fetch()
            .returning(|t, _| Ok(Some(movie(t, Some("plot")))));
        let embedder = MockEmbeddingProvider::new();

        let err = scan_entry(
            WatchlistEntry::new("Heat", 1995),
            &Catalog::new(vec![], vec![]),
            &metadata,
            &embedder,
            3,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::EmptyCatalog));
    }
}
