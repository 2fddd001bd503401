use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod watchlist;

pub use watchlist::Watchlist;

/// One row of an uploaded watchlist
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub name: String,
    pub year: i32,
}

impl WatchlistEntry {
    pub fn new(name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into(),
            year,
        }
    }
}

impl Display for WatchlistEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.year)
    }
}

/// Movie details returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    pub title: String,
    pub year: Option<String>,
    pub poster: Option<String>,
    pub runtime: Option<String>,
    pub plot: Option<String>,
    pub rating: Option<f32>,
    pub genres: Vec<String>,
}

impl MovieMetadata {
    /// Plot text usable for embedding, if any
    pub fn plot_text(&self) -> Option<&str> {
        self.plot
            .as_deref()
            .map(str::trim)
            .filter(|plot| !plot.is_empty())
    }
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Raw API response from OMDb `/?t=...&y=...`
///
/// OMDb reports misses in-band with `"Response": "False"` and uses `"N/A"` for
/// absent fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbMovie {
    pub response: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl OmdbMovie {
    pub fn is_found(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }

    /// Converts a found response, falling back to `requested_title` when OMDb
    /// omits the title
    pub fn into_metadata(self, requested_title: &str) -> MovieMetadata {
        let genres = not_available(self.genre)
            .map(|genre| {
                genre
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        MovieMetadata {
            title: not_available(self.title).unwrap_or_else(|| requested_title.to_string()),
            year: not_available(self.year),
            poster: not_available(self.poster),
            runtime: not_available(self.runtime),
            plot: not_available(self.plot),
            rating: not_available(self.imdb_rating).and_then(|r| r.parse().ok()),
            genres,
        }
    }
}

fn not_available(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != "N/A"
    })
}

// ============================================================================
// Similarity Types
// ============================================================================

/// A watchlist title paired with the embedding of its plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub label: String,
    pub vector: Vec<f32>,
}

/// Embedded view of one watchlist
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub items: Vec<CatalogItem>,
    /// Entries dropped because no plot could be fetched
    pub skipped: Vec<WatchlistEntry>,
    pub built_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>, skipped: Vec<WatchlistEntry>) -> Self {
        Self {
            items,
            skipped,
            built_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.items.first().map(|item| item.vector.len())
    }
}

/// One ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub label: String,
    pub score: f32,
}
