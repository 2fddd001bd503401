use crate::{
    error::{AppError, AppResult},
    models::{Catalog, CatalogItem, WatchlistEntry},
    services::{embedding::EmbeddingProvider, metadata::MetadataProvider},
};

/// Builds the embedded catalog for a watchlist
///
/// Plots are fetched one entry at a time, in watchlist order. Entries whose
/// lookup fails, misses, or has no plot are recorded in `Catalog::skipped`
/// rather than failing the build. All plots are embedded in a single batch.
pub async fn build_catalog(
    entries: &[WatchlistEntry],
    metadata: &dyn MetadataProvider,
    embedder: &dyn EmbeddingProvider,
) -> AppResult<Catalog> {
    let mut labels = Vec::new();
    let mut plots = Vec::new();
    let mut skipped = Vec::new();

    for entry in entries {
        match metadata.fetch(&entry.name, entry.year).await {
            Ok(Some(movie)) => match movie.plot_text() {
                Some(plot) => {
                    labels.push(entry.name.clone());
                    plots.push(plot.to_string());
                }
                None => {
                    tracing::warn!(entry = %entry, "No plot available, skipping");
                    skipped.push(entry.clone());
                }
            },
            Ok(None) => {
                tracing::warn!(entry = %entry, "Title not found, skipping");
                skipped.push(entry.clone());
            }
            Err(e) => {
                tracing::warn!(entry = %entry, error = %e, "Metadata fetch failed, skipping");
                skipped.push(entry.clone());
            }
        }
    }

    if plots.is_empty() {
        tracing::warn!(
            entries = entries.len(),
            "No plots resolved; catalog is empty"
        );
        return Ok(Catalog::new(Vec::new(), skipped));
    }

    let expected = plots.len();
    let vectors = embedder.encode(plots).await.map_err(|e| match e {
        AppError::EmbeddingUnavailable(_) => e,
        other => AppError::EmbeddingUnavailable(other.to_string()),
    })?;

    if vectors.len() != expected {
        return Err(AppError::EmbeddingUnavailable(format!(
            "requested {} embeddings, provider returned {}",
            expected,
            vectors.len()
        )));
    }

    if let Some(first) = vectors.first() {
        let dims = first.len();
        if vectors.iter().any(|v| v.len() != dims) {
            return Err(AppError::EmbeddingUnavailable(
                "provider returned vectors of mixed dimensionality".to_string(),
            ));
        }
    }

    let items: Vec<CatalogItem> = labels
        .into_iter()
        .zip(vectors)
        .map(|(label, vector)| CatalogItem { label, vector })
        .collect();

    tracing::info!(
        entries = entries.len(),
        embedded = items.len(),
        skipped = skipped.len(),
        "Catalog built"
    );

    Ok(Catalog::new(items, skipped))
}
