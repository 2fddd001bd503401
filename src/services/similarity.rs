use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, SimilarityResult},
    services::embedding::EmbeddingProvider,
};

pub const DEFAULT_TOP_K: usize = 3;

/// Which candidate is treated as the query's own entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Exclusion {
    /// Drop whatever ranks first, assuming the query matches itself best
    #[default]
    TopResult,
    /// Drop every candidate carrying this label and nothing else
    Label(String),
}

/// Cosine similarity between two vectors
///
/// Zero when either vector has zero norm, the dimensions differ or a
/// component is not finite, so scores always compare.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a * norm_b);
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(-1.0, 1.0)
}

/// Ranks `candidates` against an already-embedded query
///
/// Scores every candidate, sorts descending (stable, so ties keep catalog
/// order), removes the excluded entry and keeps the best `k`.
pub fn rank_by_vector(
    query: &[f32],
    candidates: &[CatalogItem],
    k: usize,
    exclusion: &Exclusion,
) -> AppResult<Vec<SimilarityResult>> {
    if candidates.is_empty() {
        return Err(AppError::EmptyCatalog);
    }

    let mut scored: Vec<SimilarityResult> = candidates
        .iter()
        .map(|item| SimilarityResult {
            label: item.label.clone(),
            score: cosine_similarity(query, &item.vector),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let ranked = match exclusion {
        Exclusion::TopResult => scored.into_iter().skip(1).take(k).collect(),
        Exclusion::Label(label) => scored
            .into_iter()
            .filter(|result| &result.label != label)
            .take(k)
            .collect(),
    };

    Ok(ranked)
}

/// Embeds `query_text` and ranks the catalog against it
///
/// Fails with `EmptyCatalog` before any embedding call when there are no
/// candidates, and with `EmbeddingUnavailable` when the provider fails.
pub async fn rank(
    embedder: &dyn EmbeddingProvider,
    query_text: &str,
    candidates: &[CatalogItem],
    k: usize,
    exclusion: &Exclusion,
) -> AppResult<Vec<SimilarityResult>> {
    if candidates.is_empty() {
        return Err(AppError::EmptyCatalog);
    }

    let query = embed_query(embedder, query_text).await?;
    let ranked = rank_by_vector(&query, candidates, k, exclusion)?;

    tracing::debug!(
        candidates = candidates.len(),
        k,
        returned = ranked.len(),
        exclusion = ?exclusion,
        "Catalog ranked"
    );

    Ok(ranked)
}

async fn embed_query(embedder: &dyn EmbeddingProvider, query_text: &str) -> AppResult<Vec<f32>> {
    let mut vectors = embedder
        .encode(vec![query_text.to_string()])
        .await
        .map_err(|e| match e {
            AppError::EmbeddingUnavailable(_) => e,
            other => AppError::EmbeddingUnavailable(other.to_string()),
        })?;

    if vectors.len() != 1 {
        return Err(AppError::EmbeddingUnavailable(format!(
            "expected 1 query vector, provider returned {}",
            vectors.len()
        )));
    }

    Ok(vectors.remove(0))
}
