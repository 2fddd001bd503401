/// Movie metadata provider abstraction
///
/// A provider resolves a watchlist entry (title + year) to poster, runtime, plot,
/// rating and genres. A title the database does not know is `Ok(None)`, not an error.
use crate::{error::AppResult, models::MovieMetadata};

pub mod omdb;

pub use omdb::OmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Look up one movie by title and release year
    async fn fetch(&self, title: &str, year: i32) -> AppResult<Option<MovieMetadata>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
