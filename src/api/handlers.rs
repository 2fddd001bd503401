use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{Catalog, SimilarityResult, Watchlist, WatchlistEntry};
use crate::services::{
    build_catalog,
    scan::{self, ScanResult},
    similarity::{self, Exclusion},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct WatchlistSummary {
    pub hash: String,
    pub entries: usize,
    pub catalog_size: usize,
    pub skipped: Vec<WatchlistEntry>,
    pub built_at: DateTime<Utc>,
    /// True when the catalog was reused instead of rebuilt
    pub cached: bool,
}

impl WatchlistSummary {
    fn new(watchlist: &Watchlist, catalog: &Catalog, cached: bool) -> Self {
        Self {
            hash: watchlist.hash.clone(),
            entries: watchlist.len(),
            catalog_size: catalog.len(),
            skipped: catalog.skipped.clone(),
            built_at: catalog.built_at,
            cached,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ScanParams {
    pub k: Option<usize>,
}

impl ScanParams {
    /// Parses an optional JSON body; an empty body means defaults
    fn from_body(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::InvalidInput(format!("Invalid scan request: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub plot: String,
    pub k: Option<usize>,
}

fn resolve_k(requested: Option<usize>, default: usize) -> AppResult<usize> {
    match requested {
        Some(0) => Err(AppError::InvalidInput("k must be at least 1".to_string())),
        Some(k) => Ok(k),
        None => Ok(default),
    }
}

/// Catalog for the loaded watchlist
async fn current_catalog(state: &AppState) -> AppResult<(Watchlist, Arc<Catalog>)> {
    let inner = state.inner.read().await;
    let watchlist = inner.watchlist.as_ref().ok_or(AppError::NoWatchlist)?;
    let catalog = inner
        .catalog_cache
        .get(&watchlist.hash)
        .ok_or_else(|| AppError::Internal("Catalog missing for loaded watchlist".to_string()))?;
    Ok((watchlist.clone(), catalog))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Upload a watchlist CSV and build (or reuse) its catalog
pub async fn upload_watchlist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: String,
) -> AppResult<Json<WatchlistSummary>> {
    let watchlist = Watchlist::from_csv(body.as_bytes())?;

    tracing::info!(
        request_id = %request_id,
        entries = watchlist.len(),
        hash = %watchlist.hash,
        "Processing watchlist upload"
    );

    {
        // Lookup and assignment under one guard
        let mut inner = state.inner.write().await;
        if let Some(catalog) = inner.catalog_cache.get(&watchlist.hash) {
            tracing::info!(request_id = %request_id, "Watchlist unchanged, reusing catalog");
            let summary = WatchlistSummary::new(&watchlist, &catalog, true);
            inner.watchlist = Some(watchlist);
            return Ok(Json(summary));
        }
    }

    let catalog = build_catalog(
        &watchlist.entries,
        state.metadata.as_ref(),
        state.embedder.as_ref(),
    )
    .await?;

    let mut inner = state.inner.write().await;
    let catalog = inner.catalog_cache.insert(watchlist.hash.clone(), catalog);
    let summary = WatchlistSummary::new(&watchlist, &catalog, false);
    inner.watchlist = Some(watchlist);

    tracing::info!(
        request_id = %request_id,
        catalog_size = summary.catalog_size,
        skipped = summary.skipped.len(),
        "Watchlist loaded"
    );

    Ok(Json(summary))
}

/// Describe the loaded watchlist
pub async fn get_watchlist(State(state): State<AppState>) -> AppResult<Json<WatchlistSummary>> {
    let (watchlist, catalog) = current_catalog(&state).await?;
    Ok(Json(WatchlistSummary::new(&watchlist, &catalog, true)))
}

/// Forget the watchlist and its catalog
pub async fn clear_watchlist(State(state): State<AppState>) -> StatusCode {
    let mut inner = state.inner.write().await;
    inner.watchlist = None;
    inner.catalog_cache.invalidate();
    StatusCode::NO_CONTENT
}

/// Pick a random watchlist movie and recommend similar ones
pub async fn scan(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> AppResult<Json<ScanResult>> {
    let params = ScanParams::from_body(&body)?;
    let k = resolve_k(params.k, state.recommendation_count)?;
    let (watchlist, catalog) = current_catalog(&state).await?;
    let entry = scan::pick_entry(&watchlist, &mut rand::thread_rng())?;

    tracing::info!(request_id = %request_id, entry = %entry, k, "Scanning watchlist");

    let result = scan::scan_entry(
        entry,
        &catalog,
        state.metadata.as_ref(),
        state.embedder.as_ref(),
        k,
    )
    .await?;

    Ok(Json(result))
}

/// Rank the loaded catalog against an arbitrary plot summary
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<SimilarityResult>>> {
    if request.plot.trim().is_empty() {
        return Err(AppError::InvalidInput("Plot cannot be empty".to_string()));
    }
    let k = resolve_k(request.k, state.recommendation_count)?;
    let (_, catalog) = current_catalog(&state).await?;

    tracing::info!(
        request_id = %request_id,
        k,
        candidates = catalog.len(),
        "Processing recommendation request"
    );

    let results = similarity::rank(
        state.embedder.as_ref(),
        &request.plot,
        &catalog.items,
        k,
        &Exclusion::TopResult,
    )
    .await?;

    Ok(Json(results))
}
